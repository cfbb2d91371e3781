//! Records stored as savegame patterns.

use freepark_common::LoadResult;
use freepark_fileio::{Loader, Saver};

/// A record that loads itself from, and saves itself to, a savegame pattern.
///
/// Loading fills in an existing (usually default) value, so polymorphic
/// families can construct the right empty variant first and let it read its
/// own fields. Saving always writes the current version of the pattern.
pub trait Persistent {
    /// Replace the fields of `self` with those stored at the loader position.
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()>;

    /// Append the record to the saver.
    fn save(&self, svr: &mut Saver) -> LoadResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use freepark_common::Tag;

    const TAG_SIGN: Tag = Tag(*b"SIGN");
    const CURRENT_VERSION_SIGN: u32 = 3;

    /// A park sign: `width` and `height` appeared in version 2, `caption` in version 3.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct ParkSign {
        colour: u32,
        width: u32,
        height: u32,
        caption: String,
    }

    impl Default for ParkSign {
        fn default() -> Self {
            Self { colour: 0, width: 4, height: 2, caption: "Welcome".to_string() }
        }
    }

    impl Persistent for ParkSign {
        fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
            let version = ldr.open_pattern(TAG_SIGN)?;
            ldr.check_supported(version, CURRENT_VERSION_SIGN)?;
            *self = Self::default();
            if version >= 1 {
                self.colour = ldr.get_long()?;
            }
            if version >= 2 {
                self.width = ldr.get_long()?;
                self.height = ldr.get_long()?;
            }
            if version >= 3 {
                self.caption = ldr.get_text()?;
            }
            ldr.close_pattern()
        }

        fn save(&self, svr: &mut Saver) -> LoadResult<()> {
            svr.start_pattern(TAG_SIGN, CURRENT_VERSION_SIGN);
            svr.put_long(self.colour);
            svr.put_long(self.width);
            svr.put_long(self.height);
            svr.put_text(&self.caption)?;
            svr.end_pattern()
        }
    }

    #[test]
    fn test_old_version_migrates_to_current() {
        let mut svr = Saver::new();
        svr.start_pattern(TAG_SIGN, 1);
        svr.put_long(0xFF00FF);
        svr.end_pattern().expect("end");
        let old = svr.finish().expect("finish");

        let mut sign = ParkSign::default();
        let mut ldr = Loader::new(&old);
        sign.load(&mut ldr).expect("load v1");
        ldr.finish().expect("balanced");
        assert_eq!(
            sign,
            ParkSign { colour: 0xFF00FF, ..ParkSign::default() }
        );

        let mut svr = Saver::new();
        sign.save(&mut svr).expect("save");
        let current = svr.finish().expect("finish");
        let mut ldr = Loader::new(&current);
        assert_eq!(ldr.open_pattern(TAG_SIGN).expect("open"), CURRENT_VERSION_SIGN);
        assert_eq!(ldr.get_long().expect("colour"), 0xFF00FF);
        assert_eq!(ldr.get_long().expect("width"), 4);
        assert_eq!(ldr.get_long().expect("height"), 2);
        assert_eq!(ldr.get_text().expect("caption"), "Welcome");
        ldr.close_pattern().expect("close");
    }
}
