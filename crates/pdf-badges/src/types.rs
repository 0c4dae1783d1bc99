use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BadgeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Background image {}: {reason}", .path.display())]
    Background { path: PathBuf, reason: String },
    #[error("Image error: {0}")]
    Image(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] mysql::Error),
    #[cfg(feature = "mysql")]
    #[error(
        "Could not connect to MySQL as {user} (password: {password}) on {host}, database {database}: {source}"
    )]
    Connect {
        user: String,
        /// Already redacted
        password: String,
        host: String,
        database: String,
        source: mysql::Error,
    },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BadgeError>;

/// One badge worth of text: up to three positional fields
/// (name, company, role).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeRecord {
    fields: Vec<String>,
}

impl BadgeRecord {
    /// Fields past the third are dropped.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().take(3).map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn name(&self) -> &str {
        self.field(0)
    }

    pub fn company(&self) -> &str {
        self.field(1)
    }

    pub fn role(&self) -> &str {
        self.field(2)
    }

    /// Trimmed field at `index`, or "" when absent
    fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.trim()).unwrap_or("")
    }

    pub fn presence(&self) -> Presence {
        Presence {
            name: !self.name().is_empty(),
            company: !self.company().is_empty(),
            role: !self.role().is_empty(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for BadgeRecord {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Which text fields of a record are non-empty after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Presence {
    pub name: bool,
    pub company: bool,
    pub role: bool,
}

impl Presence {
    pub fn any(self) -> bool {
        self.name || self.company || self.role
    }
}

/// The three text slots of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    Name,
    Company,
    Role,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Company, Field::Role];

    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Company => "company",
            Field::Role => "role",
        }
    }
}

/// RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::gray(0.0);

    pub const fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// Summary of a composed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    /// Number of badges drawn
    pub badges: usize,
    /// Number of pages emitted
    pub pages: usize,
}
