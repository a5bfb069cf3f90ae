use std::fs;
use std::io;
use std::path::PathBuf;

// Файловое key-value хранилище - клиентский аналог localStorage.
// Одно значение = один JSON-файл в каталоге хранилища.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStorage { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    // Повреждённый или нечитаемый файл считается отсутствующим значением
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
