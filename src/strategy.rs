//! Reorganization strategies.
//!
//! A [`Strategy`] decides, for a single file, which folder under the root it
//! should end up in. Strategies never touch the filesystem themselves; the
//! engine in [`crate::organizer`] does the moving.
//!
//! # Examples
//!
//! ```
//! use reorg::strategy::Strategy;
//! use std::path::Path;
//!
//! let root = Path::new("/data");
//! let mut rng = rand::thread_rng();
//!
//! let folder = Strategy::ByExtension.destination_folder(root, Path::new("/data/x/notes.txt"), &mut rng);
//! assert_eq!(folder, Some(root.join("txt")));
//!
//! let folder = Strategy::ByFirstCharacter.destination_folder(root, Path::new("/data/notes.txt"), &mut rng);
//! assert_eq!(folder, Some(root.join("N")));
//! ```

use crate::conflict::extension_of;
use crate::file_organizer::OrganizeError;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Smallest bucket number used by the random strategies.
pub const RANDOM_BUCKET_MIN: u32 = 1000;
/// Largest bucket number used by the random strategies (inclusive).
pub const RANDOM_BUCKET_MAX: u32 = 9999;

/// The reorganization policy applied to every eligible file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Group files into `<root>/<extension>` folders.
    ByExtension,
    /// Group files into `<root>/<uppercased first character>` folders.
    ByFirstCharacter,
    /// Drop each file into a randomly numbered folder.
    Random,
    /// Move every nested file back to the root and prune empty folders.
    Flatten,
    /// Same as [`Strategy::Random`].
    Scramble,
}

impl Strategy {
    /// Every strategy, in menu order.
    pub const ALL: [Strategy; 5] = [
        Strategy::ByExtension,
        Strategy::ByFirstCharacter,
        Strategy::Random,
        Strategy::Flatten,
        Strategy::Scramble,
    ];

    /// Returns the human-readable label shown to users.
    ///
    /// ```
    /// use reorg::strategy::Strategy;
    ///
    /// assert_eq!(Strategy::ByExtension.label(), "File Extension");
    /// assert_eq!(Strategy::Flatten.label(), "Unorganize..?");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::ByExtension => "File Extension",
            Strategy::ByFirstCharacter => "Alphanumeric Folders",
            Strategy::Random => "Random Folders",
            Strategy::Flatten => "Unorganize..?",
            Strategy::Scramble => "Scramble....?",
        }
    }

    /// Returns the short name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ByExtension => "extension",
            Strategy::ByFirstCharacter => "alphanumeric",
            Strategy::Random => "random",
            Strategy::Flatten => "unorganize",
            Strategy::Scramble => "scramble",
        }
    }

    /// Returns true if files are walked children-first so that emptied
    /// folders can be removed on the way up.
    pub fn is_bottom_up(&self) -> bool {
        matches!(self, Strategy::Flatten)
    }

    /// Computes the folder a file should be moved into.
    ///
    /// Returns `None` when the strategy leaves the file where it is, which
    /// only happens for extension-less files under [`Strategy::ByExtension`].
    ///
    /// # Arguments
    ///
    /// * `root` - The folder being reorganized
    /// * `file_path` - Path of the file, at any depth below `root`
    /// * `rng` - Random source for the random bucket strategies
    pub fn destination_folder<R: Rng + ?Sized>(
        &self,
        root: &Path,
        file_path: &Path,
        rng: &mut R,
    ) -> Option<PathBuf> {
        let file_name = file_path.file_name()?.to_string_lossy();

        match self {
            Strategy::ByExtension => extension_of(&file_name).map(|ext| root.join(ext)),
            Strategy::ByFirstCharacter => {
                let first = file_name.chars().next()?;
                Some(root.join(first.to_uppercase().collect::<String>()))
            }
            Strategy::Random | Strategy::Scramble => Some(root.join(random_bucket(rng).to_string())),
            Strategy::Flatten => Some(root.to_path_buf()),
        }
    }
}

/// Draws a bucket number in `RANDOM_BUCKET_MIN..=RANDOM_BUCKET_MAX`.
fn random_bucket<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(RANDOM_BUCKET_MIN..=RANDOM_BUCKET_MAX)
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = OrganizeError;

    /// Parses either the short name (case-insensitive) or the exact label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(strategy) = Self::ALL.iter().find(|st| st.label() == trimmed) {
            return Ok(*strategy);
        }

        match trimmed.to_lowercase().as_str() {
            "extension" | "ext" => Ok(Strategy::ByExtension),
            "alphanumeric" | "first-char" => Ok(Strategy::ByFirstCharacter),
            "random" => Ok(Strategy::Random),
            "unorganize" | "flatten" => Ok(Strategy::Flatten),
            "scramble" => Ok(Strategy::Scramble),
            _ => Err(OrganizeError::InvalidStrategy {
                label: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(4934)
    }

    #[test]
    fn test_by_extension_strips_leading_dot() {
        let root = Path::new("/root");
        let folder =
            Strategy::ByExtension.destination_folder(root, Path::new("/root/a/b/report.pdf"), &mut rng());
        assert_eq!(folder, Some(PathBuf::from("/root/pdf")));
    }

    #[test]
    fn test_by_extension_uses_last_suffix() {
        let root = Path::new("/root");
        let folder =
            Strategy::ByExtension.destination_folder(root, Path::new("/root/backup.tar.gz"), &mut rng());
        assert_eq!(folder, Some(PathBuf::from("/root/gz")));
    }

    #[test]
    fn test_by_extension_skips_extensionless_files() {
        let root = Path::new("/root");
        let strategy = Strategy::ByExtension;
        assert_eq!(strategy.destination_folder(root, Path::new("/root/Makefile"), &mut rng()), None);
        assert_eq!(strategy.destination_folder(root, Path::new("/root/.bashrc"), &mut rng()), None);
        assert_eq!(strategy.destination_folder(root, Path::new("/root/odd."), &mut rng()), None);
    }

    #[test]
    fn test_by_extension_keeps_extension_case() {
        let root = Path::new("/root");
        let folder =
            Strategy::ByExtension.destination_folder(root, Path::new("/root/IMG_01.JPG"), &mut rng());
        assert_eq!(folder, Some(PathBuf::from("/root/JPG")));
    }

    #[test]
    fn test_by_first_character_uppercases() {
        let root = Path::new("/root");
        let strategy = Strategy::ByFirstCharacter;
        assert_eq!(
            strategy.destination_folder(root, Path::new("/root/x/apple.txt"), &mut rng()),
            Some(PathBuf::from("/root/A"))
        );
        assert_eq!(
            strategy.destination_folder(root, Path::new("/root/7zip.exe"), &mut rng()),
            Some(PathBuf::from("/root/7"))
        );
        assert_eq!(
            strategy.destination_folder(root, Path::new("/root/émile.md"), &mut rng()),
            Some(PathBuf::from("/root/É"))
        );
    }

    #[test]
    fn test_random_bucket_in_range() {
        let root = Path::new("/root");
        let mut rng = rng();
        for strategy in [Strategy::Random, Strategy::Scramble] {
            for _ in 0..200 {
                let folder = strategy
                    .destination_folder(root, Path::new("/root/file.txt"), &mut rng)
                    .expect("random strategies always pick a folder");
                let bucket: u32 = folder
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.parse().ok())
                    .expect("bucket should be numeric");
                assert!((RANDOM_BUCKET_MIN..=RANDOM_BUCKET_MAX).contains(&bucket));
                assert_eq!(folder.parent(), Some(root));
            }
        }
    }

    #[test]
    fn test_scramble_matches_random_for_same_seed() {
        let root = Path::new("/root");
        let file = Path::new("/root/file.txt");
        let random = Strategy::Random.destination_folder(root, file, &mut rng());
        let scramble = Strategy::Scramble.destination_folder(root, file, &mut rng());
        assert_eq!(random, scramble);
    }

    #[test]
    fn test_flatten_targets_root() {
        let root = Path::new("/root");
        assert_eq!(
            Strategy::Flatten.destination_folder(root, Path::new("/root/a/b/c.txt"), &mut rng()),
            Some(PathBuf::from("/root"))
        );
    }

    #[test]
    fn test_parse_labels_and_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.label().parse::<Strategy>().unwrap(), strategy);
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("FLATTEN".parse::<Strategy>().unwrap(), Strategy::Flatten);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "by-size".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, OrganizeError::InvalidStrategy { .. }));
        assert!("".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_only_flatten_is_bottom_up() {
        let bottom_up: Vec<_> = Strategy::ALL.iter().filter(|s| s.is_bottom_up()).collect();
        assert_eq!(bottom_up, vec![&Strategy::Flatten]);
    }
}
