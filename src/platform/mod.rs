// QuizDeck platform paths
// Resolves the per-OS data directory where the database file lives.
//
// Linux:   $XDG_DATA_HOME/quizdeck or ~/.local/share/quizdeck
// macOS:   ~/Library/Application Support/QuizDeck
// Windows: %APPDATA%/QuizDeck

use std::env;
use std::path::PathBuf;

/// Returns the platform-specific data directory for QuizDeck.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            PathBuf::from(xdg).join("quizdeck")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("quizdeck")
        }
    }
    #[cfg(target_os = "macos")]
    {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("QuizDeck")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("QuizDeck")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from(".").join("quizdeck")
    }
}
