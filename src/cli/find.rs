use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::{DatasetConfig, DatasetsConfig, MapsConfig, PathsConfig};
use crate::enrich::locate_ids;
use crate::output::write_results;
use crate::resolve::MapReader;

use super::place::parse_sort;

#[derive(Args)]
pub struct FindArgs {
    /// File of identifiers to look up, one per line
    #[arg(required = true)]
    pub ids: PathBuf,

    /// Directory holding paths.json, maps.json, databases.json and datasets.json
    #[arg(short, long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Maps to place the identifiers on
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub maps: Vec<String>,

    /// Datasets to search; every configured dataset when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub datasets: Vec<String>,

    /// Sort positions by this unit instead of the map's default (cm or bp)
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Show identifiers that resolve to more than one position
    #[arg(long)]
    pub show_multiple: bool,

    /// Write results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Place identifiers on maps using the datasets' precomputed positions.
///
/// The lookup never touches an aligner: whatever positions the datasets
/// already recorded for an identifier are taken as its placements.
pub fn run(args: FindArgs) -> anyhow::Result<()> {
    let paths = PathsConfig::load(&args.config_dir.join("paths.json"))?;
    let maps_config = MapsConfig::load(&args.config_dir.join("maps.json"))?;
    let datasets_config = DatasetsConfig::load(&args.config_dir.join("datasets.json"))?;

    let datasets = if args.datasets.is_empty() {
        datasets_config.iter().collect()
    } else {
        args.datasets
            .iter()
            .map(|id| datasets_config.get(id))
            .collect::<Result<Vec<&DatasetConfig>, _>>()?
    };

    let ids = read_ids(&args.ids)?;
    let requested_sort = parse_sort(args.sort.as_deref())?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for map_id in &args.maps {
        let map = maps_config.get(map_id)?;
        let sort_by = map.resolve_sort(requested_sort);

        info!(map = %map.id, ids = ids.len(), "looking up identifiers");

        let reader = MapReader::new(&paths, map)?;
        let results = locate_ids(
            &paths,
            &datasets,
            &reader,
            &ids,
            sort_by,
            args.show_multiple,
        )?;
        write_results(&mut out, map, &results)?;
    }

    out.flush()?;
    Ok(())
}

fn read_ids(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}
