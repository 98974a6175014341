//! Tokenizer: classifies one raw argument string.

/// Shape of a single argument token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// The literal `--` terminator.
    DoubleDash,
    /// `--name` or `--name=value`.
    Long {
        /// Option name, dashes stripped.
        name: &'a str,
        /// Inline value after `=`, if present.
        inline: Option<&'a str>,
    },
    /// `-x`, `-xyz`, or `-xvalue`: one or more short characters whose
    /// interpretation (cluster vs. inline value) depends on the matched
    /// descriptors.
    Shorts(&'a str),
    /// Anything else: no leading dash, or a bare `-`.
    Positional(&'a str),
}

/// Classifies one raw token.
///
/// Purely shape-based; resolution against the descriptor table happens in
/// the matcher.
pub fn classify(arg: &str) -> Token<'_> {
    if arg == "--" {
        return Token::DoubleDash;
    }
    if let Some(rest) = arg.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, value)) => Token::Long {
                name,
                inline: Some(value),
            },
            None => Token::Long {
                name: rest,
                inline: None,
            },
        };
    }
    if arg.len() > 1 && arg.starts_with('-') {
        return Token::Shorts(&arg[1..]);
    }
    Token::Positional(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_dash_alone() {
        assert_eq!(classify("--"), Token::DoubleDash);
    }

    #[test]
    fn test_long_with_and_without_inline() {
        assert_eq!(
            classify("--opt"),
            Token::Long {
                name: "opt",
                inline: None
            }
        );
        assert_eq!(
            classify("--opt=val"),
            Token::Long {
                name: "opt",
                inline: Some("val")
            }
        );
        // Only the first = splits
        assert_eq!(
            classify("--opt=a=b"),
            Token::Long {
                name: "opt",
                inline: Some("a=b")
            }
        );
    }

    #[test]
    fn test_short_cluster_shape() {
        assert_eq!(classify("-v"), Token::Shorts("v"));
        assert_eq!(classify("-abc"), Token::Shorts("abc"));
    }

    #[test]
    fn test_positional_shapes() {
        assert_eq!(classify("arg"), Token::Positional("arg"));
        assert_eq!(classify("-"), Token::Positional("-"));
        assert_eq!(classify(""), Token::Positional(""));
    }
}
