//! Error types for the denali core library.
//!
//! Every failure surfaced by the codecs and builders falls into one of three
//! kinds: malformed text ([`ParseError`]), invalid caller input
//! ([`ArgumentError`]) or a capability compiled out of the current build
//! ([`DenaliError::MissingDependency`]). Each enum carries a stable
//! machine-readable code so front ends can report failures without matching
//! on message text.

use std::{fmt, io};

use thiserror::Error;

use crate::{NodeId, capability::Capability};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($pattern:tt)* } )?
                    $( ( $($tuple:tt)* ) )?
                    => $code:expr
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
                    $(
                        Self::$ErrVariant
                            $( { $($pattern)* } )?
                            $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// Malformed input encountered while decoding one of the denali text formats.
///
/// Line numbers are 1-based and refer to the whole input stream, so an error
/// inside the `subtree` section of a selection file points at the offending
/// line of the selection file itself.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// A token that must be an integer id could not be parsed.
    #[error("line {line}: `{token}` is not a valid integer id")]
    InvalidInteger {
        /// Line containing the token.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A token that must be a scalar value could not be parsed.
    #[error("line {line}: `{token}` is not a valid number")]
    InvalidFloat {
        /// Line containing the token.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// The tree input ended before the vertex count line.
    #[error("tree input is empty; expected a vertex count")]
    MissingVertexCount,
    /// The vertex count line did not hold a single non-negative integer.
    #[error("line {line}: `{text}` is not a valid vertex count")]
    InvalidVertexCount {
        /// Line holding the count.
        line: usize,
        /// Trimmed content of the line.
        text: String,
    },
    /// A line carried fewer tokens than its record requires.
    #[error("line {line}: expected at least {expected} tokens, found {found}")]
    TooFewTokens {
        /// Line with missing tokens.
        line: usize,
        /// Minimum number of tokens for the record.
        expected: usize,
        /// Number of tokens present.
        found: usize,
    },
    /// A tree edge line ended with a member id lacking its value.
    #[error("line {line}: member list has an id without a value")]
    UnpairedMember {
        /// Line of the edge record.
        line: usize,
    },
    /// The tree input declared more vertices than it listed.
    #[error("tree declares {declared} vertices but only {found} were listed")]
    TruncatedVertices {
        /// Count from the header line.
        declared: usize,
        /// Vertex lines actually present.
        found: usize,
    },
    /// A tree edge referenced a vertex with no `id value` line.
    #[error("line {line}: edge references undeclared vertex {node}")]
    UndeclaredVertex {
        /// Line of the edge record.
        line: usize,
        /// The undeclared endpoint.
        node: NodeId,
    },
    /// A tabular row had the wrong number of columns.
    #[error("line {line}: `{section}` rows need {expected} columns, found {found}")]
    ColumnCount {
        /// Section or file kind being decoded.
        section: &'static str,
        /// Offending line.
        line: usize,
        /// Required column count.
        expected: usize,
        /// Columns present.
        found: usize,
    },
    /// A section whose body must be non-empty had no lines.
    #[error("section `{section}` has no content")]
    EmptySection {
        /// Name of the empty section.
        section: &'static str,
    },
    /// A required section was absent.
    #[error("required section `{section}` is missing")]
    MissingSection {
        /// Name of the missing section.
        section: &'static str,
    },
    /// The `component` section did not describe exactly one edge.
    #[error("component must list exactly two nodes (one edge), found {rows}")]
    ComponentShape {
        /// Number of node rows present.
        rows: usize,
    },
    /// Content appeared before the first section header.
    #[error("line {line}: content before the first section header")]
    OrphanBody {
        /// First non-blank line preceding any header.
        line: usize,
    },
    /// The subtree does not contain the node it must be rooted at.
    #[error("subtree does not contain its root {root}")]
    RootNotInSubtree {
        /// Requested root id.
        root: NodeId,
    },
    /// A subtree reduction named an edge the rooted subtree does not have.
    #[error("subtree reduction references missing edge {parent} -> {child}")]
    UnknownReductionEdge {
        /// Parent endpoint of the missing edge.
        parent: NodeId,
        /// Child endpoint of the missing edge.
        child: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`ParseError`] variants.
    enum ParseErrorCode for ParseError {
        /// A token that must be an integer id could not be parsed.
        InvalidInteger => InvalidInteger { .. } => "PARSE_INVALID_INTEGER",
        /// A token that must be a scalar value could not be parsed.
        InvalidFloat => InvalidFloat { .. } => "PARSE_INVALID_FLOAT",
        /// The tree input ended before the vertex count line.
        MissingVertexCount => MissingVertexCount => "PARSE_MISSING_VERTEX_COUNT",
        /// The vertex count line was malformed.
        InvalidVertexCount => InvalidVertexCount { .. } => "PARSE_INVALID_VERTEX_COUNT",
        /// A line carried too few tokens.
        TooFewTokens => TooFewTokens { .. } => "PARSE_TOO_FEW_TOKENS",
        /// A member id lacked its value.
        UnpairedMember => UnpairedMember { .. } => "PARSE_UNPAIRED_MEMBER",
        /// Fewer vertex lines than declared.
        TruncatedVertices => TruncatedVertices { .. } => "PARSE_TRUNCATED_VERTICES",
        /// An edge endpoint was never declared.
        UndeclaredVertex => UndeclaredVertex { .. } => "PARSE_UNDECLARED_VERTEX",
        /// A row had the wrong column count.
        ColumnCount => ColumnCount { .. } => "PARSE_COLUMN_COUNT",
        /// A section body was empty.
        EmptySection => EmptySection { .. } => "PARSE_EMPTY_SECTION",
        /// A required section was absent.
        MissingSection => MissingSection { .. } => "PARSE_MISSING_SECTION",
        /// The component was not a single edge.
        ComponentShape => ComponentShape { .. } => "PARSE_COMPONENT_SHAPE",
        /// Content before the first header.
        OrphanBody => OrphanBody { .. } => "PARSE_ORPHAN_BODY",
        /// The subtree root is absent.
        RootNotInSubtree => RootNotInSubtree { .. } => "PARSE_ROOT_NOT_IN_SUBTREE",
        /// A reduction named a missing edge.
        UnknownReductionEdge => UnknownReductionEdge { .. } => "PARSE_UNKNOWN_REDUCTION_EDGE",
    }
}

/// Invalid caller-supplied input to a builder or writer.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// The point cloud had no rows.
    #[error("point cloud contains no points")]
    EmptyPointCloud,
    /// The point cloud rows had zero columns.
    #[error("points must have positive dimension")]
    ZeroDimension,
    /// Point rows had differing lengths.
    #[error("point {row} has {found} coordinates, expected {expected}")]
    RaggedPoints {
        /// Offending row.
        row: usize,
        /// Dimension established by the first row.
        expected: usize,
        /// Coordinates in the offending row.
        found: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point {row} has a non-finite coordinate in column {column}")]
    NonFiniteCoordinate {
        /// Offending row.
        row: usize,
        /// Offending column.
        column: usize,
    },
    /// The neighbour count was zero.
    #[error("neighbour count must be at least 1")]
    ZeroNeighbors,
    /// The neighbour count was not smaller than the number of points.
    #[error("neighbour count {k} must be smaller than the number of points ({points})")]
    TooManyNeighbors {
        /// Requested neighbour count.
        k: usize,
        /// Number of points available.
        points: usize,
    },
    /// Parallel id/value inputs had different lengths.
    #[error("got {ids} ids but {values} values")]
    LengthMismatch {
        /// Number of ids.
        ids: usize,
        /// Number of values.
        values: usize,
    },
    /// A tree node had no scalar value to serialise.
    #[error("node {node} has no value")]
    MissingNodeValue {
        /// Node lacking a value.
        node: NodeId,
    },
    /// A merge referenced a cluster id that does not exist at that point.
    #[error("merge {merge} references unknown cluster {cluster}")]
    UnknownCluster {
        /// Index of the offending merge record.
        merge: usize,
        /// The unknown cluster id.
        cluster: NodeId,
    },
    /// A merge consumed a cluster that an earlier merge already consumed.
    #[error("merge {merge} reuses cluster {cluster}, which was already merged")]
    ClusterMergedTwice {
        /// Index of the offending merge record.
        merge: usize,
        /// The reused cluster id.
        cluster: NodeId,
    },
    /// A merge joined a cluster with itself.
    #[error("merge {merge} joins cluster {cluster} with itself")]
    SelfMerge {
        /// Index of the offending merge record.
        merge: usize,
        /// The cluster id.
        cluster: NodeId,
    },
    /// `alpha` and `beta` produced no usable exponential scale.
    #[error("height range alpha={alpha}, beta={beta} is degenerate")]
    DegenerateHeightRange {
        /// Height mapped to `gamma`.
        alpha: f64,
        /// Height mapped to `1`.
        beta: f64,
    },
    /// `gamma` must be finite and positive.
    #[error("gamma must be finite and positive (got {gamma})")]
    InvalidGamma {
        /// The rejected value.
        gamma: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ArgumentError`] variants.
    enum ArgumentErrorCode for ArgumentError {
        /// The point cloud had no rows.
        EmptyPointCloud => EmptyPointCloud => "ARGUMENT_EMPTY_POINT_CLOUD",
        /// The point cloud rows had zero columns.
        ZeroDimension => ZeroDimension => "ARGUMENT_ZERO_DIMENSION",
        /// Point rows had differing lengths.
        RaggedPoints => RaggedPoints { .. } => "ARGUMENT_RAGGED_POINTS",
        /// A coordinate was NaN or infinite.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "ARGUMENT_NON_FINITE_COORDINATE",
        /// The neighbour count was zero.
        ZeroNeighbors => ZeroNeighbors => "ARGUMENT_ZERO_NEIGHBORS",
        /// The neighbour count was too large.
        TooManyNeighbors => TooManyNeighbors { .. } => "ARGUMENT_TOO_MANY_NEIGHBORS",
        /// Parallel inputs had different lengths.
        LengthMismatch => LengthMismatch { .. } => "ARGUMENT_LENGTH_MISMATCH",
        /// A tree node had no value.
        MissingNodeValue => MissingNodeValue { .. } => "ARGUMENT_MISSING_NODE_VALUE",
        /// A merge referenced an unknown cluster.
        UnknownCluster => UnknownCluster { .. } => "ARGUMENT_UNKNOWN_CLUSTER",
        /// A cluster was merged twice.
        ClusterMergedTwice => ClusterMergedTwice { .. } => "ARGUMENT_CLUSTER_MERGED_TWICE",
        /// A cluster was merged with itself.
        SelfMerge => SelfMerge { .. } => "ARGUMENT_SELF_MERGE",
        /// The exponential height range was degenerate.
        DegenerateHeightRange => DegenerateHeightRange { .. } => "ARGUMENT_DEGENERATE_HEIGHT_RANGE",
        /// `gamma` was not finite and positive.
        InvalidGamma => InvalidGamma { .. } => "ARGUMENT_INVALID_GAMMA",
    }
}

/// Error type returned by the public denali API.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DenaliError {
    /// Input text was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Caller-supplied values were invalid.
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),
    /// The operation needs a capability that this build does not provide.
    #[error("the `{capability}` capability is not available in this build")]
    MissingDependency {
        /// Capability that was required.
        capability: Capability,
    },
    /// Reading from or writing to the underlying stream failed.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

define_error_codes! {
    /// Stable codes describing [`DenaliError`] variants.
    enum DenaliErrorCode for DenaliError {
        /// Input text was malformed.
        Parse => Parse(..) => "DENALI_PARSE_ERROR",
        /// Caller-supplied values were invalid.
        InvalidArgument => InvalidArgument(..) => "DENALI_INVALID_ARGUMENT",
        /// A required capability is missing.
        MissingDependency => MissingDependency { .. } => "DENALI_MISSING_DEPENDENCY",
        /// Stream i/o failed.
        Io => Io(..) => "DENALI_IO",
    }
}

impl DenaliError {
    /// Retrieve the inner [`ParseErrorCode`] when the error came from a parser.
    #[must_use]
    pub const fn parse_code(&self) -> Option<ParseErrorCode> {
        match self {
            Self::Parse(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`ArgumentErrorCode`] when the caller passed invalid input.
    #[must_use]
    pub const fn argument_code(&self) -> Option<ArgumentErrorCode> {
        match self {
            Self::InvalidArgument(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DenaliError>;
