//! Picking the override flag out of a raw argument list
//!
//! Applications embedding the loader usually own their command line, so the
//! override flag is extracted without rejecting unknown arguments.

/// Name of the override flag, without dashes.
pub const OVERRIDE_FLAG: &str = "rkset";

/// Collect every value given to `--rkset`, in order.
///
/// Accepts `--rkset value` and `--rkset=value`. The first element is taken
/// to be the program name and skipped. Arguments after `--` are ignored.
pub fn rkset_values<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let long = format!("--{OVERRIDE_FLAG}");
    let inline = format!("{long}=");

    let mut values = Vec::new();
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        if arg == "--" {
            break;
        }
        if arg == long {
            match args.next() {
                Some(value) => values.push(value.as_ref().to_string()),
                None => tracing::warn!("--{OVERRIDE_FLAG} given without a value, ignoring"),
            }
        } else if let Some(value) = arg.strip_prefix(&inline) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separate_and_inline_values() {
        let values = rkset_values([
            "app",
            "--port",
            "80",
            "--rkset",
            "a=1,b=2",
            "--rkset=c[0]=3",
            "--verbose",
        ]);
        assert_eq!(values, vec!["a=1,b=2", "c[0]=3"]);
    }

    #[test]
    fn test_program_name_is_skipped() {
        assert!(rkset_values(["--rkset=a=1"]).is_empty());
    }

    #[test]
    fn test_trailing_flag_without_value() {
        assert!(rkset_values(["app", "--rkset"]).is_empty());
    }

    #[test]
    fn test_stops_at_double_dash() {
        let values = rkset_values(["app", "--rkset=a=1", "--", "--rkset=b=2"]);
        assert_eq!(values, vec!["a=1"]);
    }

    #[test]
    fn test_similar_flags_are_ignored() {
        assert!(rkset_values(["app", "--rksetx=a=1", "-rkset", "a=1"]).is_empty());
    }
}
