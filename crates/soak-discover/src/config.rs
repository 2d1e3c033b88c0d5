use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DiscoverConfig {
    /// Directory whose entries are the targets.
    pub dir: PathBuf,
    /// Keep only the entry whose file name equals this value exactly.
    pub filter: Option<String>,
}

impl DiscoverConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(name.into());
        self
    }
}
