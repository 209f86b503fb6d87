mod settings;

pub use settings::{default_bookmarks_file, Settings, BOOKMARKS_ENV};
