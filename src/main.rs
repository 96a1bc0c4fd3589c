//! CLI interface for the vector store

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use vectordb::dataset;
use vectordb::{
    DistanceMetric, Element, FlatIndex, IndexBackend, Scored, TopKIndex, Values, Vector,
    VectorStore,
};

#[derive(Parser)]
#[command(name = "vectordb")]
#[command(about = "An in-memory vector store with exact similarity search", long_about = None)]
struct Cli {
    /// Numeric element kind of the stored vectors
    #[arg(long, value_enum, default_value = "f64")]
    kind: KindArg,

    /// Index type to use for search
    #[arg(long, value_enum, default_value = "flat")]
    index: IndexType,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum KindArg {
    I32,
    I64,
    F32,
    F64,
}

#[derive(ValueEnum, Clone, Copy)]
enum IndexType {
    Flat,
    Topk,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a dataset for the vectors nearest to a query
    Search {
        /// JSON dataset to load
        #[arg(short, long)]
        data: PathBuf,
        /// Query as "1,2,3" (dense) or "0:1,4:2" (sparse)
        query: String,
        /// Number of results to return; negative values return nothing
        #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
        k: i64,
        /// Metric: euclidean, cosine, dot, manhattan or chebyshev
        #[arg(short, long, default_value = "euclidean")]
        metric: DistanceMetric,
    },
    /// Print a vector by ID
    Get {
        #[arg(short, long)]
        data: PathBuf,
        /// Vector ID
        id: String,
    },
    /// Print the dimensionality of a dataset
    Dims {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// List all vector IDs in a dataset
    List {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Run the built-in three-vector example
    Demo {
        #[arg(short, long, default_value = "euclidean")]
        metric: DistanceMetric,
    },
}

fn load<T: Element, I: IndexBackend<T>>(store: &mut VectorStore<T, I>, path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;
    let records = dataset::read_records::<T, _>(BufReader::new(file))
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    let count = dataset::load_into(store, records)?;
    info!(count, path = %path.display(), kind = T::KIND.name(), "loaded dataset");
    Ok(())
}

fn format_values<T: Element>(vector: &Vector<T>) -> String {
    match vector.values() {
        Values::Dense(data) => data
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Values::Sparse(map) => map
            .iter()
            .map(|(index, value)| format!("{}:{}", index, value))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn print_results<T: Element>(results: &[Scored<'_, T>], metric: DistanceMetric) {
    if results.is_empty() {
        println!("No results found");
        return;
    }
    println!("Top {} results ({}):", results.len(), metric);
    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. {} [{}] (score: {:.4})",
            i + 1,
            result.id(),
            format_values(result.vector),
            result.score
        );
    }
}

fn run<T: Element, I: IndexBackend<T>>(mut store: VectorStore<T, I>, command: Commands) -> Result<()> {
    match command {
        Commands::Search {
            data,
            query,
            k,
            metric,
        } => {
            load(&mut store, &data)?;
            let values: Values<T> = query.parse()?;
            let query = Vector::new("query", values);
            let k = usize::try_from(k).unwrap_or(0);
            let results = store.search_scored(&query, k, metric)?;
            print_results(&results, metric);
        }
        Commands::Get { data, id } => {
            load(&mut store, &data)?;
            let (vector, metadata) = store.get_with_metadata(&id)?;
            println!("{} ({} dims): [{}]", vector.id(), vector.dimensions(), format_values(vector));
            let mut fields: Vec<_> = metadata.iter().collect();
            fields.sort();
            for (key, value) in fields {
                println!("  {} = {}", key, value);
            }
        }
        Commands::Dims { data } => {
            load(&mut store, &data)?;
            println!("dimensions: {}", store.dimensions()?);
            println!("max dimensions: {}", store.max_dimensions()?);
        }
        Commands::List { data } => {
            load(&mut store, &data)?;
            let ids = store.ids();
            if ids.is_empty() {
                println!("No vectors in store");
            } else {
                println!("Vector IDs ({} total):", ids.len());
                for id in ids {
                    println!("  - {}", id);
                }
            }
        }
        Commands::Demo { metric } => {
            store.add("vec1", Values::<T>::parse_dense("1, 2, 3")?);
            store.add("vec2", Values::<T>::parse_dense("4, 5, 6")?);
            store.add("vec3", Values::<T>::parse_dense("7, 8, 9")?);
            let query = Vector::new("query", Values::<T>::parse_dense("10, 3, 10")?);
            let results = store.search_scored(&query, 2, metric)?;
            print_results(&results, metric);
        }
    }
    Ok(())
}

fn run_with_index<T: Element>(index: IndexType, command: Commands) -> Result<()> {
    match index {
        IndexType::Flat => run(VectorStore::<T, _>::with_index(FlatIndex), command),
        IndexType::Topk => run(VectorStore::<T, _>::with_index(TopKIndex), command),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vectordb=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.kind {
        KindArg::I32 => run_with_index::<i32>(cli.index, cli.command),
        KindArg::I64 => run_with_index::<i64>(cli.index, cli.command),
        KindArg::F32 => run_with_index::<f32>(cli.index, cli.command),
        KindArg::F64 => run_with_index::<f64>(cli.index, cli.command),
    }
}
