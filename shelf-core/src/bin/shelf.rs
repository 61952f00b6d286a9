//! Command-line front-end for the catalog engine.
//!
//! ```bash
//! # Filter the table with a shareable query string
//! shelf search --books libros.json --authors autores.json \
//!     --query 'publicaci%C3%B3n=198&temas=Drama' --sort titulo
//!
//! # Print the index by author
//! shelf index --books libros.json --view autor
//!
//! # Dashboard series, top 5 themes
//! shelf stats --books libros.json --authors autores.json --top 5
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=shelf_core=debug`).

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use shelf_core::codec;
use shelf_core::display::{format_year, language_note, result_count_label, TypeFamily};
use shelf_core::grouping::{IndexView, Section, WorkNode};
use shelf_core::stats::{uploads_by_month_for_types, PieSlice, Tally};
use shelf_core::Catalog;
use shelf_types::{Book, CatalogConfig, SortColumn, SortDirection, SortState, ViewMode};
use tracing_subscriber::EnvFilter;

/// Query, index and statistics over a static book catalog
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Path to the books JSON array
    #[arg(long)]
    books: PathBuf,

    /// Path to the authors JSON array
    #[arg(long)]
    authors: Option<PathBuf>,

    /// Path to the reported-IDs JSON array
    #[arg(long)]
    reported: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and sort the results table
    Search {
        #[command(flatten)]
        data: DataArgs,

        /// Encoded filter state, as found after `?` in a shared link
        #[arg(long, default_value = "")]
        query: String,

        /// Sort column: titulo, autor, año or tipo
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Print the alphabetical index
    Index {
        #[command(flatten)]
        data: DataArgs,

        /// Grouping: `obra` or `autor`
        #[arg(long, default_value = "obra")]
        view: String,
    },

    /// Print the statistics dashboard
    Stats {
        #[command(flatten)]
        data: DataArgs,

        /// Number of themes in the top-themes chart
        #[arg(long)]
        top: Option<usize>,

        /// Minimum books for a year to be charted
        #[arg(long)]
        min_year_count: Option<usize>,

        /// Type to plot as its own uploads series (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Search {
            data,
            query,
            sort,
            desc,
        } => {
            let sort = match sort {
                Some(name) => {
                    let Some(column) = SortColumn::parse(&name) else {
                        bail!("unknown sort column: {name}");
                    };
                    let direction = if desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    };
                    Some(SortState { column, direction })
                }
                None => None,
            };
            let catalog = load(&data, CatalogConfig::immediate())?;
            search(&catalog, &query, sort);
        }
        Command::Index { data, view } => {
            let catalog = load(&data, CatalogConfig::immediate())?;
            index(&catalog, ViewMode::parse(&view));
        }
        Command::Stats {
            data,
            top,
            min_year_count,
            types,
        } => {
            let mut config = CatalogConfig::immediate();
            if let Some(top) = top {
                config.top_themes = top;
            }
            if let Some(min) = min_year_count {
                config.min_year_count = min;
            }
            let catalog = load(&data, config)?;
            stats(&catalog, &types);
        }
    }

    Ok(())
}

fn load(data: &DataArgs, config: CatalogConfig) -> Result<Catalog> {
    let catalog = Catalog::load(
        &data.books,
        data.authors.as_deref(),
        data.reported.as_deref(),
        config,
    )?;
    Ok(catalog)
}

fn search(catalog: &Catalog, query: &str, sort: Option<SortState>) {
    let state = codec::decode(query);
    let rows = catalog.search(&state, sort);

    println!("{}", result_count_label(rows.len()));
    for book in rows {
        let family = TypeFamily::of(&book.kind).map_or("", TypeFamily::css_class);
        let flags = match (book.is_edited(), catalog.can_report(book)) {
            (true, true) => " [editado] [reportable]",
            (true, false) => " [editado]",
            (false, true) => " [reportable]",
            (false, false) => "",
        };
        println!(
            "{} | {} | {} | {} {}{}",
            book.title,
            book.author,
            format_year(&book.year),
            book.kind,
            family,
            flags
        );
    }

    let canonical = codec::encode(&state);
    if !canonical.is_empty() {
        println!("?{canonical}");
    }
}

fn index(catalog: &Catalog, mode: ViewMode) {
    let home = catalog.config().home_language;

    match catalog.index(mode) {
        IndexView::ByWork(sections) => {
            for section in &sections {
                print_heading(section);
                for node in &section.items {
                    match node {
                        WorkNode::Book(book) => {
                            println!("  {}, {}{}", book.title, book.author, note(book, home));
                        }
                        WorkNode::Saga(saga) => {
                            println!("  {} ({})", saga.name, saga.author_label());
                            for book in &saga.books {
                                if saga.shows_member_authors() {
                                    println!("    {}, {}{}", book.title, book.author, note(book, home));
                                } else {
                                    println!("    {}{}", book.title, note(book, home));
                                }
                            }
                        }
                    }
                }
            }
        }
        IndexView::ByAuthor(sections) => {
            for section in &sections {
                print_heading(section);
                for entry in &section.items {
                    println!("  {}", entry.name);
                    for book in &entry.books {
                        println!("    {}{}", book.title, note(book, home));
                    }
                }
            }
        }
    }
}

fn note(book: &Book, home_language: &str) -> String {
    language_note(book, home_language).map_or_else(String::new, |n| format!(" {n}"))
}

fn print_heading<T>(section: &Section<T>) {
    println!(
        "[{}] {} ({})",
        section.bucket.anchor(),
        section.bucket.label(),
        section.items.len()
    );
}

fn stats(catalog: &Catalog, types: &[String]) {
    let dashboard = catalog.dashboard();
    println!("{dashboard}");

    let types: Vec<&str> = types.iter().map(String::as_str).collect();
    let chart = uploads_by_month_for_types(
        catalog.books(),
        &types,
        catalog.config().unspecified_label,
    );
    println!("\nuploads");
    for series in &chart.series {
        println!("  {}", series.label);
        for (month, count) in chart.months.iter().zip(&series.counts) {
            println!("    {} {}", month.short_label(), count);
        }
    }

    print_tallies("publication years", &dashboard.publications);
    print_slices("types", &dashboard.kinds);
    print_slices("languages", &dashboard.languages);
    print_slices("original languages", &dashboard.originals);
    print_slices("author sex", &dashboard.author_sexes);
    print_slices("author country", &dashboard.author_countries);
    print_tallies("top themes", &dashboard.top_themes);
}

fn print_tallies(title: &str, tallies: &[Tally<'_>]) {
    println!("\n{title}");
    for t in tallies {
        println!("  {} {}", t.label, t.count);
    }
}

fn print_slices(title: &str, slices: &[PieSlice<'_>]) {
    println!("\n{title}");
    for s in slices {
        println!("  {} {} {}", s.label, s.count, s.color);
    }
}
