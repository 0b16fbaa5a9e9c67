#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Filter directive for the subscriber. Connection pool chatter from `hyper` stays quiet
    /// below `trace`.
    pub fn directive(&self) -> String {
        match self {
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info,hyper_util=warn,reqwest=warn",
            Verbosity::Debug => "debug,hyper_util=info",
            Verbosity::Trace => "trace",
        }
        .to_string()
    }
}

pub fn verbosity_parser(s: &str) -> Result<Verbosity, String> {
    let level = s.parse::<u8>().map_err(|err| err.to_string())?;

    match level {
        1 => Ok(Verbosity::Error),
        2 => Ok(Verbosity::Warn),
        3 => Ok(Verbosity::Info),
        4 => Ok(Verbosity::Debug),
        5 => Ok(Verbosity::Trace),
        _ => Err(format!("verbosity must be between 1 and 5, got {level}")),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", Verbosity::Error)]
    #[case("3", Verbosity::Info)]
    #[case("5", Verbosity::Trace)]
    fn test_verbosity_levels(#[case] input: &str, #[case] expected: Verbosity) {
        assert_eq!(verbosity_parser(input), Ok(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("6")]
    #[case("loud")]
    fn test_verbosity_out_of_range(#[case] input: &str) {
        assert!(verbosity_parser(input).is_err());
    }
}
