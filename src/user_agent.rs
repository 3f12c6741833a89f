//! `User-Agent` header construction.

use core::fmt;

use thiserror::Error;

/// Returned when a field is added twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to redefine field {0}")]
pub struct DuplicateFieldError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    version: String,
    options: Vec<String>,
}

/// Builder for the `User-Agent` header sent with every request.
///
/// The default agent identifies the library, the OS and the language:
///
/// ```
/// use checkout_connector::UserAgent;
///
/// let mut agent = UserAgent::default();
/// agent.add_field("Module", "Shop", &["plugin 1.0"]).unwrap();
///
/// let value = agent.to_string();
/// assert!(value.starts_with("Library/checkout-connector_"));
/// assert!(value.ends_with("Module/Shop (plugin 1.0)"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    fields: Vec<Field>,
}

impl UserAgent {
    /// Creates an empty user agent with no fields.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a `name/version (options)` field.
    ///
    /// Fails if a field called `name` already exists.
    pub fn add_field(
        &mut self,
        name: &str,
        version: &str,
        options: &[&str],
    ) -> Result<(), DuplicateFieldError> {
        if self.fields.iter().any(|field| field.name == name) {
            return Err(DuplicateFieldError(name.to_string()));
        }
        self.fields.push(Field {
            name: name.to_string(),
            version: version.to_string(),
            options: options.iter().map(|opt| opt.to_string()).collect(),
        });
        Ok(())
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        let mut agent = Self::empty();
        agent.fields.push(Field {
            name: "Library".to_string(),
            version: format!("checkout-connector_{}", env!("CARGO_PKG_VERSION")),
            options: Vec::new(),
        });
        agent.fields.push(Field {
            name: "OS".to_string(),
            version: format!("{}_{}", std::env::consts::OS, std::env::consts::ARCH),
            options: Vec::new(),
        });
        agent.fields.push(Field {
            name: "Language".to_string(),
            version: "Rust".to_string(),
            options: Vec::new(),
        });
        agent
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}/{}", field.name, field.version)?;
            if !field.options.is_empty() {
                write!(f, " ({})", field.options.join(" ; "))?;
            }
        }
        Ok(())
    }
}
