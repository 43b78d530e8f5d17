use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::align::{AlignerChain, AlignerKind, SearchEngine};
use crate::config::{
    DatabasesConfig, DatasetConfig, DatasetsConfig, MapsConfig, PathsConfig,
};
use crate::core::types::{RefType, SortField, Thresholds};
use crate::enrich::{build_intervals, collect_features, merge};
use crate::output::{write_enriched, write_leftovers, write_results};
use crate::resolve::{resolve_hits, MapReader};

#[derive(Args)]
pub struct PlaceArgs {
    /// Query sequences in FASTA format
    #[arg(required = true)]
    pub query: PathBuf,

    /// Directory holding paths.json, maps.json, databases.json and datasets.json
    #[arg(short, long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Maps to place the queries on
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub maps: Vec<String>,

    /// Alignment tools, tried in order on the still-unaligned queries
    #[arg(short, long, default_value = "blastn", value_delimiter = ',')]
    pub aligners: Vec<String>,

    /// Minimum alignment identity, percent
    #[arg(long, default_value_t = 98.0)]
    pub min_identity: f64,

    /// Minimum query coverage, percent
    #[arg(long, default_value_t = 95.0)]
    pub min_coverage: f64,

    /// Datasets to enrich the placements with
    #[arg(short, long, value_delimiter = ',')]
    pub datasets: Vec<String>,

    /// Extension around each placement when searching datasets, in the
    /// map's sort units
    #[arg(short, long, default_value_t = 0.0)]
    pub window: f64,

    /// Keep queries and features on separate rows instead of fusing
    /// overlapping ones
    #[arg(long)]
    pub collapsed: bool,

    /// Sort positions by this unit instead of the map's default (cm or bp)
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Show markers that resolve to more than one position
    #[arg(long)]
    pub show_multiple: bool,

    /// Threads passed to the alignment tools
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Write results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: PlaceArgs, verbose: bool) -> anyhow::Result<()> {
    let paths = PathsConfig::load(&args.config_dir.join("paths.json"))?;
    let maps_config = MapsConfig::load(&args.config_dir.join("maps.json"))?;
    let databases = DatabasesConfig::load(&args.config_dir.join("databases.json"))?;
    let datasets_config = DatasetsConfig::load(&args.config_dir.join("datasets.json"))?;

    let kinds = args
        .aligners
        .iter()
        .map(|name| name.parse::<AlignerKind>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| anyhow::anyhow!(err))?;

    let datasets = args
        .datasets
        .iter()
        .map(|id| datasets_config.get(id))
        .collect::<Result<Vec<&DatasetConfig>, _>>()?;

    let requested_sort = parse_sort(args.sort.as_deref())?;
    let thresholds = Thresholds::new(args.min_identity, args.min_coverage);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for map_id in &args.maps {
        let map = maps_config.get(map_id)?;
        let sort_by = map.resolve_sort(requested_sort);

        info!(map = %map.id, sort = %sort_by, "placing queries");

        let adapters = kinds
            .iter()
            .map(|kind| kind.build(&paths, args.threads, verbose))
            .collect();
        let chain = AlignerChain::new(adapters, paths.tmp_dir.clone());
        let mut engine = SearchEngine::new(chain, map.search, RefType::Std);

        let alignment = engine.perform(&args.query, &map.db_list, &databases, thresholds)?;
        let reader = MapReader::new(&paths, map)?;
        let results = resolve_hits(
            &reader,
            &alignment.aligned,
            alignment.unaligned,
            sort_by,
            args.show_multiple,
        )?;

        if datasets.is_empty() {
            write_results(&mut out, map, &results)?;
        } else {
            let intervals = build_intervals(&results.mapped, sort_by, args.window);
            let features = collect_features(&paths, &datasets, &reader, &intervals, sort_by)?;
            let rows =
                merge(results.mapped.clone(), features, sort_by, args.window, args.collapsed);
            write_enriched(&mut out, map, &results.map_name, &rows)?;
            write_leftovers(&mut out, &results)?;
        }
    }

    out.flush()?;
    Ok(())
}

pub(crate) fn parse_sort(sort: Option<&str>) -> anyhow::Result<Option<SortField>> {
    match sort {
        None => Ok(None),
        Some("cm") => Ok(Some(SortField::Cm)),
        Some("bp") => Ok(Some(SortField::Bp)),
        Some(other) => bail!("unknown sort unit '{other}', expected 'cm' or 'bp'"),
    }
}
