//! Command implementations and argument parsing for the `denali` binary.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use denali_core::{
    ComplexBuilder, DEFAULT_GAMMA, DenaliError, NeighborStrategy, NodeId, PointCloud, Selection,
    build_cluster_tree, exp_height_factory, read_linkage, read_points, read_selection, read_tree,
    write_edges, write_tree, write_vertices,
};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "denali",
    about = "Prepare and inspect files for the denali contour-tree viewer."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a k-nearest-neighbour complex and write the `ctree` inputs.
    Complex(ComplexArgs),
    /// Build a cluster tree from a single-linkage matrix.
    ClusterTree(ClusterTreeArgs),
    /// Summarise a selection file written by denali.
    Selection(SelectionArgs),
    /// Summarise a `.tree` file.
    Tree(TreeArgs),
}

/// Options accepted by the `complex` command.
#[derive(Debug, Args, Clone)]
pub struct ComplexArgs {
    /// Whitespace-separated numeric table, one point per row.
    pub points: PathBuf,

    /// Number of neighbours connected to each point.
    #[arg(short = 'k', long = "neighbours")]
    pub k: usize,

    /// Destination of the vertex-value file.
    #[arg(long)]
    pub vertices: PathBuf,

    /// Destination of the edge file.
    #[arg(long)]
    pub edges: PathBuf,

    /// Column holding the vertex values (defaults to the last column).
    #[arg(long)]
    pub value_column: Option<usize>,

    /// Neighbour search engine.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,
}

/// Neighbour search engines selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    /// Pick an engine from the number of points.
    Auto,
    /// Always use the k-d tree.
    KdTree,
    /// Always compare every pair of points.
    BruteForce,
}

impl From<StrategyArg> for NeighborStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::KdTree => Self::KdTree,
            StrategyArg::BruteForce => Self::BruteForce,
        }
    }
}

/// Options accepted by the `cluster-tree` command.
#[derive(Debug, Args, Clone)]
pub struct ClusterTreeArgs {
    /// Linkage matrix with `left right height` rows.
    pub linkage: PathBuf,

    /// Destination of the `.tree` file.
    #[arg(long)]
    pub output: PathBuf,

    /// Merge height mapped to `gamma` on the exponential scale.
    #[arg(long, requires = "beta", allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Merge height mapped to `1` on the exponential scale.
    #[arg(long, requires = "alpha", allow_negative_numbers = true)]
    pub beta: Option<f64>,

    /// Value reached at `alpha`.
    #[arg(long, default_value_t = DEFAULT_GAMMA, requires = "alpha")]
    pub gamma: f64,
}

/// Options accepted by the `selection` command.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Selection file handed to a denali callback.
    pub path: PathBuf,

    /// Output format of the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options accepted by the `tree` command.
#[derive(Debug, Args, Clone)]
pub struct TreeArgs {
    /// `.tree` file to inspect.
    pub path: PathBuf,
}

/// Rendering of the `selection` summary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Short human-readable report.
    Text,
    /// The parsed record as JSON.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Opening or writing a file failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The requested value column is missing from a row of the table.
    #[error("row {row} has {columns} columns; value column {column} is out of range")]
    ValueColumn {
        /// Zero-based row index.
        row: usize,
        /// Requested column.
        column: usize,
        /// Columns present in the row.
        columns: usize,
    },
    /// Rendering an output file failed; nothing was written to `path`.
    #[error("failed to render `{path}`: {source}")]
    Render {
        /// Output path that was not written.
        path: PathBuf,
        /// Underlying core error.
        #[source]
        source: DenaliError,
    },
    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] DenaliError),
}

impl CliError {
    /// Returns the core error behind this failure, if there is one.
    #[must_use]
    pub fn core(&self) -> Option<&DenaliError> {
        match self {
            Self::Core(source) | Self::Render { source, .. } => Some(source),
            Self::Io { .. } | Self::ValueColumn { .. } => None,
        }
    }
}

/// Outcome of a CLI command, ready for [`render_summary`].
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Files written by `complex`.
    Complex {
        /// Number of points read.
        points: usize,
        /// Coordinates per point.
        dimension: usize,
        /// Edges written.
        edges: usize,
    },
    /// Tree written by `cluster-tree`.
    ClusterTree {
        /// Original points of the clustering.
        leaves: usize,
        /// Nodes in the written tree.
        nodes: usize,
        /// Root of the cluster tree.
        root: NodeId,
    },
    /// Parsed selection.
    Selection {
        /// The parsed record.
        selection: Box<Selection>,
        /// Requested output format.
        format: OutputFormat,
    },
    /// Counts of a parsed `.tree` file.
    Tree {
        /// Vertex count.
        nodes: usize,
        /// Edge count.
        edges: usize,
        /// Members attached to edges.
        members: usize,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or parsed, an output
/// cannot be written, or the arguments are rejected by the core library.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use denali_cli::cli::{Cli, Command, ExecutionSummary, TreeArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "2\n0 1.5\n1 2.5\n0 1\n")?;
/// let cli = Cli {
///     command: Command::Tree(TreeArgs {
///         path: file.path().to_path_buf(),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary, ExecutionSummary::Tree { nodes: 2, edges: 1, members: 0 }));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Complex(args) => {
            span.record("command", field::display("complex"));
            run_complex(args)
        }
        Command::ClusterTree(args) => {
            span.record("command", field::display("cluster-tree"));
            run_cluster_tree(args)
        }
        Command::Selection(args) => {
            span.record("command", field::display("selection"));
            run_selection(args)
        }
        Command::Tree(args) => {
            span.record("command", field::display("tree"));
            run_tree(&args)
        }
    }
}

#[instrument(
    name = "cli.complex",
    err,
    skip(args),
    fields(path = %args.points.display(), k = args.k, strategy = ?args.strategy),
)]
pub(super) fn run_complex(args: ComplexArgs) -> Result<ExecutionSummary, CliError> {
    let rows = read_points(open_reader(&args.points)?)?;
    let (coordinates, values) = split_value_column(&rows, args.value_column)?;
    let cloud = PointCloud::from_rows(&coordinates).map_err(DenaliError::from)?;
    let edges = ComplexBuilder::new(args.k)
        .with_strategy(args.strategy.into())
        .build(&cloud)?;

    write_output(&args.vertices, |writer| write_vertices(writer, &values))?;
    write_output(&args.edges, |writer| write_edges(writer, &edges))?;

    info!(
        points = cloud.len(),
        edges = edges.len(),
        "complex written"
    );
    Ok(ExecutionSummary::Complex {
        points: cloud.len(),
        dimension: cloud.dimension(),
        edges: edges.len(),
    })
}

#[instrument(
    name = "cli.cluster_tree",
    err,
    skip(args),
    fields(path = %args.linkage.display(), scale = field::Empty),
)]
pub(super) fn run_cluster_tree(args: ClusterTreeArgs) -> Result<ExecutionSummary, CliError> {
    let merges = read_linkage(open_reader(&args.linkage)?)?;
    let span = Span::current();
    let tree = match (args.alpha, args.beta) {
        (Some(alpha), Some(beta)) => {
            span.record("scale", field::display("exponential"));
            let height = exp_height_factory(alpha, beta, args.gamma).map_err(DenaliError::from)?;
            build_cluster_tree(&merges, height)?
        }
        _ => {
            span.record("scale", field::display("raw"));
            build_cluster_tree(&merges, |merge| merge.height)?
        }
    };

    write_output(&args.output, |writer| write_tree(writer, tree.tree()))?;

    info!(
        nodes = tree.tree().node_count(),
        root = tree.root(),
        "cluster tree written"
    );
    Ok(ExecutionSummary::ClusterTree {
        leaves: merges.len() + 1,
        nodes: tree.tree().node_count(),
        root: tree.root(),
    })
}

#[instrument(name = "cli.selection", err, skip(args), fields(path = %args.path.display()))]
pub(super) fn run_selection(args: SelectionArgs) -> Result<ExecutionSummary, CliError> {
    let selection = read_selection(open_reader(&args.path)?)?;
    let (parent, child) = selection.component.edge();
    info!(parent, child, "selection read");
    Ok(ExecutionSummary::Selection {
        selection: Box::new(selection),
        format: args.format,
    })
}

#[instrument(name = "cli.tree", err, skip(args), fields(path = %args.path.display()))]
pub(super) fn run_tree(args: &TreeArgs) -> Result<ExecutionSummary, CliError> {
    let tree = read_tree(open_reader(&args.path)?)?;
    Ok(ExecutionSummary::Tree {
        nodes: tree.node_count(),
        edges: tree.edge_count(),
        members: tree.member_count(),
    })
}

/// Splits the value column off every row, leaving the coordinates.
pub(super) fn split_value_column(
    rows: &[Vec<f64>],
    column: Option<usize>,
) -> Result<(Vec<Vec<f64>>, Vec<f64>), CliError> {
    let mut coordinates = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    for (row, cells) in rows.iter().enumerate() {
        let index = column.unwrap_or_else(|| cells.len().saturating_sub(1));
        let Some(&value) = cells.get(index) else {
            return Err(CliError::ValueColumn {
                row,
                column: index,
                columns: cells.len(),
            });
        };
        let mut point = cells.clone();
        point.remove(index);
        coordinates.push(point);
        values.push(value);
    }
    Ok((coordinates, values))
}

#[instrument(name = "cli.open_reader", err)]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Renders an output file in memory, then writes it to `path`.
///
/// Nothing is created at `path` when rendering fails.
#[instrument(name = "cli.write_output", skip(render), err)]
pub(super) fn write_output(
    path: &Path,
    render: impl FnOnce(&mut Vec<u8>) -> denali_core::Result<()>,
) -> Result<(), CliError> {
    let mut buffer = Vec::new();
    render(&mut buffer).map_err(|source| CliError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, &buffer).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = buffer.len(), "output written");
    Ok(())
}

/// Renders `summary` to `writer`.
///
/// Selections requested as JSON are written as a single pretty-printed
/// object; every other summary is a short `key: value` report.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use denali_cli::cli::{ExecutionSummary, render_summary};
/// let summary = ExecutionSummary::Tree { nodes: 3, edges: 2, members: 4 };
/// let mut out = Vec::new();
/// render_summary(&summary, &mut out)?;
/// assert_eq!(String::from_utf8_lossy(&out), "nodes: 3\nedges: 2\nmembers: 4\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Complex {
            points,
            dimension,
            edges,
        } => {
            writeln!(writer, "points: {points}")?;
            writeln!(writer, "dimension: {dimension}")?;
            writeln!(writer, "edges: {edges}")
        }
        ExecutionSummary::ClusterTree {
            leaves,
            nodes,
            root,
        } => {
            writeln!(writer, "leaves: {leaves}")?;
            writeln!(writer, "nodes: {nodes}")?;
            writeln!(writer, "root: {root}")
        }
        ExecutionSummary::Selection {
            selection,
            format: OutputFormat::Json,
        } => {
            serde_json::to_writer_pretty(&mut writer, selection)?;
            writeln!(writer)
        }
        ExecutionSummary::Selection {
            selection,
            format: OutputFormat::Text,
        } => render_selection(selection, writer),
        ExecutionSummary::Tree {
            nodes,
            edges,
            members,
        } => {
            writeln!(writer, "nodes: {nodes}")?;
            writeln!(writer, "edges: {edges}")?;
            writeln!(writer, "members: {members}")
        }
    }
}

fn render_selection(selection: &Selection, mut writer: impl Write) -> io::Result<()> {
    let (parent, child) = selection.component.edge();
    writeln!(writer, "component {parent} --> {child}")?;
    if let Some(file) = &selection.file {
        writeln!(writer, "file: {}", file.display())?;
    }
    writeln!(writer, "members: {}", selection.members.len())?;
    if let Some(reduction) = selection.reduction {
        writeln!(writer, "reduction: {reduction:?}")?;
    }
    if let Some(subtree) = &selection.subtree {
        writeln!(
            writer,
            "subtree: {} nodes rooted at {}",
            subtree.tree().node_count(),
            subtree.root()
        )?;
    }
    Ok(())
}
