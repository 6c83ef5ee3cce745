use std::{error::Error, fmt, iter};

/// Formats an error followed by all of its sources, separated by `: `.
pub struct PrintErrorChain<'a>(pub &'a dyn Error);

impl fmt::Display for PrintErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = iter::successors(Some(self.0), |&err| err.source());

        for (depth, err) in chain.enumerate() {
            if depth > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{err}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PrintErrorChain;
    use crate::error::Error;
    use std::{io, path::PathBuf};

    #[test]
    fn prints_every_source_in_order() {
        let err = Error::Persistence {
            path: PathBuf::from("out/data.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };

        assert_eq!(
            PrintErrorChain(&err).to_string(),
            "failed to write 'out/data.json': permission denied"
        );
    }

    #[test]
    fn prints_lone_error_without_separator() {
        let err = Error::Authentication("code expired".to_owned());

        assert_eq!(
            PrintErrorChain(&err).to_string(),
            "authentication failed: code expired"
        );
    }
}
