use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::config::{MapConfig, MapsConfig};
use crate::core::types::MapKind;

#[derive(Args)]
pub struct MapsArgs {
    /// Directory holding maps.json
    #[arg(short, long, default_value = "config")]
    pub config_dir: PathBuf,
}

pub fn run(args: MapsArgs) -> anyhow::Result<()> {
    let maps = MapsConfig::load(&args.config_dir.join("maps.json"))?;

    let mut out = io::stdout().lock();
    writeln!(out, "#id\tname\tkind\tunits\tsearch\tdatabases")?;
    for map in maps.iter() {
        writeln!(out, "{}", describe(map))?;
    }

    Ok(())
}

fn describe(map: &MapConfig) -> String {
    let kind = match map.kind {
        MapKind::Physical => "physical",
        MapKind::Anchored => "anchored",
    };
    let units = match (map.has_cm, map.has_bp) {
        (true, true) => "cm,bp",
        (true, false) => "cm",
        (false, true) => "bp",
        (false, false) => "none",
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        map.id,
        map.name,
        kind,
        units,
        map.search,
        map.db_list.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MapId, SearchPolicy, SortField};

    #[test]
    fn test_describe_row() {
        let map = MapConfig {
            id: MapId::new("morex_genome"),
            name: "Morex Genome".to_string(),
            has_cm: false,
            has_bp: true,
            default_sort: SortField::Bp,
            kind: MapKind::Physical,
            search: SearchPolicy::Greedy,
            db_list: vec!["morex_v3".to_string()],
            map_dir: "morex_genome".to_string(),
        };

        assert_eq!(
            describe(&map),
            "morex_genome\tMorex Genome\tphysical\tbp\tgreedy\tmorex_v3"
        );
    }
}
