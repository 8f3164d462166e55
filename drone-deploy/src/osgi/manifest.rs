//! JAR manifest main-section parsing.

/// Path of the manifest inside a JAR.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const BUNDLE_VERSION: &str = "Bundle-Version";
pub const FRAGMENT_HOST: &str = "Fragment-Host";

/// Main attributes of a JAR manifest.
///
/// Only the main section is kept; per-entry sections are irrelevant for
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// Handles CRLF line endings and 72-byte continuation lines (a line
    /// starting with a single space continues the previous value).
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut attributes: Vec<(String, String)> = Vec::new();

        for (line_no, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            // Blank line terminates the main section.
            if line.is_empty() {
                if attributes.is_empty() {
                    continue;
                }
                break;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                match attributes.last_mut() {
                    Some((_, value)) => value.push_str(continuation),
                    None => {
                        return Err(format!(
                            "line {}: continuation without a header",
                            line_no + 1
                        ))
                    }
                }
                continue;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| format!("line {}: expected 'Name: value'", line_no + 1))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("line {}: empty header name", line_no + 1));
            }
            let value = value.strip_prefix(' ').unwrap_or(value);
            attributes.push((name.to_string(), value.to_string()));
        }

        Ok(Self { attributes })
    }

    /// Look up a main attribute. Header names are case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
