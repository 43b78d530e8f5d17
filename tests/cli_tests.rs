//! End-to-end tests of the seqplace binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn seqplace() -> Command {
    Command::cargo_bin("seqplace").unwrap()
}

/// A minimal but complete config directory: one physical map, one database,
/// one gene dataset.
fn write_config(root: &Path) {
    let config = root.join("config");
    std::fs::create_dir_all(&config).unwrap();

    std::fs::write(
        config.join("paths.json"),
        format!(
            r#"{{
                "blastn_app": "/usr/bin/false",
                "blastn_dbs": "{root}/dbs",
                "hsblastn_app": "/usr/bin/false",
                "hsblastn_dbs": "{root}/dbs",
                "gmap_app": "/usr/bin/false",
                "gmapl_app": "/usr/bin/false",
                "gmap_dbs": "{root}/dbs",
                "maps_dir": "{root}/maps",
                "datasets_dir": "{root}/datasets",
                "tmp_dir": "{root}"
            }}"#,
            root = root.display()
        ),
    )
    .unwrap();

    std::fs::write(
        config.join("maps.json"),
        r#"[{
            "id": "morex_genome",
            "name": "Morex Genome",
            "has_cm": false,
            "has_bp": true,
            "default_sort": "bp",
            "kind": "physical",
            "search": "greedy",
            "db_list": ["morex_v3"],
            "map_dir": "morex_genome"
        }]"#,
    )
    .unwrap();

    std::fs::write(
        config.join("databases.json"),
        r#"[{"id": "morex_v3", "name": "Morex v3", "ref_type": "big"}]"#,
    )
    .unwrap();

    std::fs::write(
        config.join("datasets.json"),
        r#"[{"id": "genes_hc", "name": "HC Genes", "kind": "gene"}]"#,
    )
    .unwrap();

    let map_dir = root.join("maps").join("morex_genome");
    std::fs::create_dir_all(&map_dir).unwrap();
    std::fs::write(map_dir.join("morex_genome.chrom"), "chr1H\t1\nchr2H\t2\n").unwrap();

    let ds_dir = root.join("datasets").join("genes_hc");
    std::fs::create_dir_all(&ds_dir).unwrap();
    std::fs::write(
        ds_dir.join("genes_hc.morex_genome"),
        "gene_a\tchr1H\t1000\ngene_b\tchr2H\t5000\n",
    )
    .unwrap();
}

#[test]
fn test_no_args_shows_usage() {
    seqplace()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_maps_lists_configured_maps() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());

    seqplace()
        .arg("maps")
        .arg("--config-dir")
        .arg(dir.path().join("config"))
        .assert()
        .success()
        .stdout(predicate::str::contains("morex_genome"))
        .stdout(predicate::str::contains("physical"))
        .stdout(predicate::str::contains("greedy"));
}

#[test]
fn test_maps_with_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    seqplace()
        .arg("maps")
        .arg("--config-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("maps.json"));
}

#[test]
fn test_place_requires_maps_argument() {
    let dir = tempfile::tempdir().unwrap();
    let query = dir.path().join("markers.fasta");
    std::fs::write(&query, ">m1\nACGT\n").unwrap();

    seqplace()
        .arg("place")
        .arg(&query)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--maps"));
}

#[test]
fn test_place_rejects_unknown_aligner() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());
    let query = dir.path().join("markers.fasta");
    std::fs::write(&query, ">m1\nACGT\n").unwrap();

    seqplace()
        .arg("place")
        .arg(&query)
        .arg("--config-dir")
        .arg(dir.path().join("config"))
        .arg("--maps")
        .arg("morex_genome")
        .arg("--aligners")
        .arg("bowtie")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown aligner 'bowtie'"));
}

#[test]
fn test_find_places_known_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());
    let ids = dir.path().join("ids.txt");
    std::fs::write(&ids, "gene_a\nnope\n").unwrap();

    seqplace()
        .arg("find")
        .arg(&ids)
        .arg("--config-dir")
        .arg(dir.path().join("config"))
        .arg("--maps")
        .arg("morex_genome")
        .assert()
        .success()
        .stdout(predicate::str::contains("gene_a\tchr1H\t1000"))
        .stdout(predicate::str::contains("##Unaligned"))
        .stdout(predicate::str::contains("nope"));
}

#[test]
fn test_find_rejects_unknown_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());
    let ids = dir.path().join("ids.txt");
    std::fs::write(&ids, "gene_a\n").unwrap();

    seqplace()
        .arg("find")
        .arg(&ids)
        .arg("--config-dir")
        .arg(dir.path().join("config"))
        .arg("--maps")
        .arg("morex_genome")
        .arg("--datasets")
        .arg("no_such_ds")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_ds"));
}

#[test]
fn test_place_rejects_unknown_map() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());
    let query = dir.path().join("markers.fasta");
    std::fs::write(&query, ">m1\nACGT\n").unwrap();

    seqplace()
        .arg("place")
        .arg(&query)
        .arg("--config-dir")
        .arg(dir.path().join("config"))
        .arg("--maps")
        .arg("no_such_map")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown map 'no_such_map'"));
}
