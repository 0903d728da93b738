use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Entry names indexed by global card offset.
#[derive(Debug, Clone, Default)]
pub struct Entries {
    pub names: Vec<String>,
}

impl Entries {
    /// Load one entry name per line.
    ///
    /// Lines are kept in order, including blank ones, so that a line's
    /// position is its global offset. Trailing blank lines are dropped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let reader = BufReader::new(file);

        let mut names = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read line {} from {:?}", line_num + 1, path))?;
            names.push(line.trim().to_string());
        }

        while names.last().is_some_and(|name| name.is_empty()) {
            names.pop();
        }

        log::info!("Loaded {} entries from {:?}", names.len(), path);
        Ok(Self { names })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Name at `global_offset`, if the list is long enough and the line is not blank.
    pub fn name(&self, global_offset: u32) -> Option<&str> {
        self.names
            .get(global_offset as usize)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
