use std::path::PathBuf;

use crate::error::AppResult;

/// Plain-text store for the single summarization API key.
///
/// The file holds exactly the key, UTF-8, no delimiters. A missing file is
/// not an error: it reads back as an empty key.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    key_file: PathBuf,
}

impl CredentialStore {
    pub fn new(key_file: PathBuf) -> Self {
        Self { key_file }
    }

    pub fn load(&self) -> AppResult<String> {
        match std::fs::read_to_string(&self.key_file) {
            Ok(raw) => Ok(raw.trim().to_owned()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(error) => Err(error.into()),
        }
    }

    pub fn save(&self, key: &str) -> AppResult<()> {
        if let Some(parent) = self.key_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.key_file, key)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = std::fs::metadata(&self.key_file)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.key_file, perms)?;
        }

        Ok(())
    }

    pub fn key_file(&self) -> &std::path::Path {
        &self.key_file
    }
}

#[cfg(test)]
mod tests {
    use super::CredentialStore;

    #[test]
    fn missing_key_file_reads_back_as_empty_key() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let store = CredentialStore::new(tmp.path().join("api_key.txt"));
        assert_eq!(store.load().expect("load"), "");
    }

    #[test]
    fn save_then_load_round_trips_the_key() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let store = CredentialStore::new(tmp.path().join("keys/api_key.txt"));

        store.save("sk-xyz").expect("save");
        assert_eq!(store.load().expect("load"), "sk-xyz");
    }

    #[test]
    fn save_overwrites_wholesale() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let store = CredentialStore::new(tmp.path().join("api_key.txt"));

        store.save("first-key-that-is-long").expect("save");
        store.save("second").expect("save again");
        assert_eq!(store.load().expect("load"), "second");
    }

    #[test]
    fn load_trims_surrounding_whitespace() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let key_file = tmp.path().join("api_key.txt");
        std::fs::write(&key_file, "  sk-abc\n").expect("write");

        let store = CredentialStore::new(key_file);
        assert_eq!(store.load().expect("load"), "sk-abc");
    }

    #[test]
    fn empty_key_is_persisted_as_empty_file() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let store = CredentialStore::new(tmp.path().join("api_key.txt"));

        store.save("").expect("save");
        assert!(store.key_file().exists());
        assert_eq!(store.load().expect("load"), "");
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_readable_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().expect("tempdir");
        let store = CredentialStore::new(tmp.path().join("api_key.txt"));
        store.save("sk-xyz").expect("save");

        let mode = std::fs::metadata(store.key_file())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
