use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use buildline_db::repositories::{AssemblyGroupRepo, AssemblyRepo, ClientRepo, MaterialRepo};
use buildline_seed::fixtures::{self, FileReport, FixtureError};
use sqlx::PgPool;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

/// Fresh directory holding the given files.
fn scratch_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("buildline-seed-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (file, body) in files {
        std::fs::write(dir.join(file), body).unwrap();
    }
    dir
}

fn counts(reports: &[FileReport]) -> Vec<(&'static str, usize, usize)> {
    reports.iter().map(|r| (r.file, r.inserted, r.skipped)).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn loads_every_file_in_order(pool: PgPool) {
    let reports = fixtures::load_all(&pool, &fixtures_dir()).await.unwrap();

    assert_eq!(
        counts(&reports),
        vec![
            ("materials.json", 8, 0),
            ("assembly_categories.json", 2, 0),
            ("assemblies.json", 3, 0),
            ("assembly_groups.json", 2, 0),
            ("clients.json", 2, 0),
            ("users.json", 3, 0),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn names_resolve_to_ids(pool: PgPool) {
    fixtures::load_all(&pool, &fixtures_dir()).await.unwrap();

    let wall = AssemblyRepo::find_by_name(&pool, "Interior Partition Wall, 8ft")
        .await
        .unwrap()
        .unwrap();
    let lines = AssemblyRepo::list_materials(&pool, wall.id).await.unwrap();
    assert_eq!(lines.len(), 4);
    let stud = MaterialRepo::find_by_name(&pool, "2x4 Stud, 8ft").await.unwrap().unwrap();
    assert!(lines.iter().any(|l| l.material_id == stud.id && l.quantity == 1.5));

    let group = AssemblyGroupRepo::find_by_name(&pool, "Finish Upgrades")
        .await
        .unwrap()
        .unwrap();
    let items = AssemblyGroupRepo::list_items(&pool, group.id).await.unwrap();
    let tiled = AssemblyRepo::find_by_name(&pool, "Tiled Wall Finish").await.unwrap().unwrap();
    let painted = items.iter().find(|i| i.assembly_name == "Painted Wall Finish").unwrap();
    assert_eq!(painted.conflicts_with, vec![tiled.id]);
    let tiled_item = items.iter().find(|i| i.assembly_id == tiled.id).unwrap();
    assert_eq!(tiled_item.quantity, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_run_skips_existing_records(pool: PgPool) {
    fixtures::load_all(&pool, &fixtures_dir()).await.unwrap();
    let reports = fixtures::load_all(&pool, &fixtures_dir()).await.unwrap();

    assert!(reports.iter().all(|r| r.inserted == 0));
    let skipped: usize = reports.iter().map(|r| r.skipped).sum();
    assert_eq!(skipped, 20);
    assert_eq!(MaterialRepo::list(&pool).await.unwrap().len(), 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clients_without_email_are_always_inserted(pool: PgPool) {
    let dir = scratch_dir(
        "no-email",
        &[("clients.json", r#"[{"contact_name": "Walk-in"}]"#)],
    );
    fixtures::load_clients(&pool, &dir).await.unwrap();
    let report = fixtures::load_clients(&pool, &dir).await.unwrap();

    assert_eq!((report.inserted, report.skipped), (1, 0));
    assert_eq!(ClientRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_files_load_nothing(pool: PgPool) {
    let dir = scratch_dir("empty", &[]);
    let reports = fixtures::load_all(&pool, &dir).await.unwrap();
    assert_eq!(reports.len(), 6);
    assert!(reports.iter().all(|r| r.inserted == 0 && r.skipped == 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_material_name_is_reported(pool: PgPool) {
    let dir = scratch_dir(
        "unknown-material",
        &[
            ("assembly_categories.json", r#"[{"name": "Framing"}]"#),
            (
                "assemblies.json",
                r#"[{"name": "Wall", "category": "Framing", "materials": [{"material": "Unobtainium", "quantity": 1}]}]"#,
            ),
        ],
    );
    let err = fixtures::load_all(&pool, &dir).await.unwrap_err();

    assert_matches!(
        err,
        FixtureError::UnknownReference { entity: "material", ref name, .. } if name == "Unobtainium"
    );
    assert!(AssemblyRepo::find_by_name(&pool, "Wall").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_group_shape_is_rejected(pool: PgPool) {
    let dir = scratch_dir(
        "two-defaults",
        &[
            ("assembly_categories.json", r#"[{"name": "Finishes"}]"#),
            (
                "assemblies.json",
                r#"[{"name": "Paint", "category": "Finishes"}, {"name": "Tile", "category": "Finishes"}]"#,
            ),
            (
                "assembly_groups.json",
                r#"[{"name": "Finish", "group_type": "CHOOSE_ONE", "items": [
                    {"assembly": "Paint", "is_default": true},
                    {"assembly": "Tile", "is_default": true}
                ]}]"#,
            ),
        ],
    );
    let err = fixtures::load_all(&pool, &dir).await.unwrap_err();

    assert_matches!(err, FixtureError::Invalid { file: "assembly_groups.json", .. });
    assert!(AssemblyGroupRepo::find_by_name(&pool, "Finish").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_names_the_file(pool: PgPool) {
    let dir = scratch_dir("malformed", &[("materials.json", "{not json")]);
    let err = fixtures::load_all(&pool, &dir).await.unwrap_err();
    assert_matches!(err, FixtureError::Parse { ref path, .. } if path.ends_with("materials.json"));
}
