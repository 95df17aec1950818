//! Error types for the plexus core library.
//!
//! Each public error enum carries a stable, machine-readable code so callers
//! can log and match failures without depending on display strings.

use std::fmt;

use thiserror::Error;

use crate::node::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced when configuring a random graph generator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeneratorError {
    /// A generation parameter was outside its accepted range.
    #[error("invalid generator parameter `{parameter}`: {reason}")]
    InvalidParameters {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable explanation of the accepted range.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`GeneratorError`] variants.
    enum GeneratorErrorCode for GeneratorError {
        /// A generation parameter was outside its accepted range.
        InvalidParameters => InvalidParameters { .. } => "GENERATOR_INVALID_PARAMETERS",
    }
}

/// Error produced by occupation-centrality random walks.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum WalkError {
    /// Walk parameters were invalid.
    #[error("invalid walk parameter: {reason}")]
    InvalidParameters {
        /// Explanation of the rejected value.
        reason: String,
    },
    /// The walk was asked to start from a node the graph does not hold.
    #[error("node {node} is not present in the graph")]
    UnknownNode {
        /// The missing start node.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`WalkError`] variants.
    enum WalkErrorCode for WalkError {
        /// Walk parameters were invalid.
        InvalidParameters => InvalidParameters { .. } => "WALK_INVALID_PARAMETERS",
        /// The start node is absent.
        UnknownNode => UnknownNode { .. } => "WALK_UNKNOWN_NODE",
    }
}

/// Error produced by structural measures that depend on the degree cache.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MeasureError {
    /// The degree cache holds no entry for a node.
    #[error("degree of node {node} has not been computed; call recompute_degrees first")]
    DegreeNotComputed {
        /// Node whose cached degree is missing.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`MeasureError`] variants.
    enum MeasureErrorCode for MeasureError {
        /// The degree cache holds no entry for a node.
        DegreeNotComputed => DegreeNotComputed { .. } => "MEASURE_DEGREE_NOT_COMPUTED",
    }
}

/// Error produced when configuring an influence simulation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InfluenceError {
    /// A simulation parameter was outside its accepted range.
    #[error("invalid influence parameter `{parameter}`: {reason}")]
    InvalidParameters {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Explanation of the accepted range.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`InfluenceError`] variants.
    enum InfluenceErrorCode for InfluenceError {
        /// A simulation parameter was outside its accepted range.
        InvalidParameters => InvalidParameters { .. } => "INFLUENCE_INVALID_PARAMETERS",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::generator(
        GeneratorError::InvalidParameters { parameter: "k", reason: "odd".into() }.code().as_str(),
        "GENERATOR_INVALID_PARAMETERS"
    )]
    #[case::walk_params(
        WalkError::InvalidParameters { reason: "zero".into() }.code().as_str(),
        "WALK_INVALID_PARAMETERS"
    )]
    #[case::walk_node(
        WalkError::UnknownNode { node: NodeId::new(3) }.code().as_str(),
        "WALK_UNKNOWN_NODE"
    )]
    #[case::measure(
        MeasureError::DegreeNotComputed { node: NodeId::new(1) }.code().as_str(),
        "MEASURE_DEGREE_NOT_COMPUTED"
    )]
    #[case::influence(
        InfluenceError::InvalidParameters { parameter: "p", reason: "2".into() }.code().as_str(),
        "INFLUENCE_INVALID_PARAMETERS"
    )]
    fn codes_are_stable(#[case] actual: &str, #[case] expected: &str) {
        assert_eq!(actual, expected);
    }

    #[test]
    fn code_display_matches_as_str() {
        let code = WalkErrorCode::UnknownNode;
        assert_eq!(code.to_string(), code.as_str());
    }
}
