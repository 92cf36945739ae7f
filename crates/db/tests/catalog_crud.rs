//! Integration tests for the catalog repositories: materials, assembly
//! categories, assemblies and assembly groups.

use buildline_db::models::assembly::{AssemblyMaterialInput, CreateAssembly};
use buildline_db::models::assembly_category::CreateAssemblyCategory;
use buildline_db::models::assembly_group::{CreateAssemblyGroup, CreateGroupItem};
use buildline_db::models::material::CreateMaterial;
use buildline_db::repositories::{
    AssemblyCategoryRepo, AssemblyGroupRepo, AssemblyRepo, MaterialRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_material(name: &str, price: f64) -> CreateMaterial {
    CreateMaterial {
        name: name.to_string(),
        part_number: None,
        manufacturer: None,
        unit: None,
        price: Some(price),
        purchase_url: None,
        datasheet_file: None,
    }
}

fn new_category(name: &str) -> CreateAssemblyCategory {
    CreateAssemblyCategory {
        name: name.to_string(),
        description: None,
        color: None,
        icon: None,
    }
}

fn new_assembly(name: &str, category_id: i64, materials: &[(i64, f64)]) -> CreateAssembly {
    CreateAssembly {
        name: name.to_string(),
        description: None,
        part_number: None,
        manufacturer: None,
        unit: None,
        price: Some(100.0),
        category_id,
        materials: materials
            .iter()
            .map(|&(material_id, quantity)| AssemblyMaterialInput {
                material_id,
                quantity,
            })
            .collect(),
    }
}

fn group_item(assembly_id: i64, is_default: bool) -> CreateGroupItem {
    CreateGroupItem {
        assembly_id,
        quantity: None,
        conflicts_with: vec![],
        is_default,
        sort_order: None,
    }
}

fn is_fk_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_material_defaults(pool: PgPool) {
    let material = MaterialRepo::create(&pool, &new_material("2x4 Stud", 4.25))
        .await
        .unwrap();
    assert_eq!(material.unit, "each");
    assert_eq!(material.price, 4.25);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_material_name_rejected(pool: PgPool) {
    MaterialRepo::create(&pool, &new_material("Rebar", 1.0)).await.unwrap();
    let err = MaterialRepo::create(&pool, &new_material("Rebar", 2.0))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.constraint(), Some("uq_materials_name"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referenced_material_cannot_be_deleted(pool: PgPool) {
    let material = MaterialRepo::create(&pool, &new_material("Drywall", 12.0))
        .await
        .unwrap();
    let category = AssemblyCategoryRepo::create(&pool, &new_category("Walls"))
        .await
        .unwrap();
    AssemblyRepo::create(&pool, &new_assembly("Wall", category.id, &[(material.id, 4.0)]))
        .await
        .unwrap();

    let err = MaterialRepo::delete(&pool, material.id).await.unwrap_err();
    assert!(is_fk_violation(&err), "got {err:?}");
    assert!(MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(
        MaterialRepo::count_assembly_usages(&pool, material.id).await.unwrap(),
        1
    );
}

// ---------------------------------------------------------------------------
// Assemblies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assembly_materials_written_and_replaced(pool: PgPool) {
    let stud = MaterialRepo::create(&pool, &new_material("Stud", 4.0)).await.unwrap();
    let screw = MaterialRepo::create(&pool, &new_material("Screw", 0.1)).await.unwrap();
    let category = AssemblyCategoryRepo::create(&pool, &new_category("Framing"))
        .await
        .unwrap();

    let created = AssemblyRepo::create(
        &pool,
        &new_assembly("Frame", category.id, &[(stud.id, 8.0), (screw.id, 40.0)]),
    )
    .await
    .unwrap();
    assert_eq!(created.assembly.category_name, "Framing");
    assert_eq!(created.materials.len(), 2);

    let updated = AssemblyRepo::update(
        &pool,
        created.assembly.id,
        &new_assembly("Frame", category.id, &[(stud.id, 10.0)]),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.materials.len(), 1);
    assert_eq!(updated.materials[0].material_name, "Stud");
    assert_eq!(updated.materials[0].quantity, 10.0);

    let refreshed = AssemblyCategoryRepo::find_by_id(&pool, category.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.assembly_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_material_insert_rolls_back_assembly(pool: PgPool) {
    let category = AssemblyCategoryRepo::create(&pool, &new_category("Roofing"))
        .await
        .unwrap();

    let result = AssemblyRepo::create(&pool, &new_assembly("Roof", category.id, &[(9999, 1.0)])).await;
    assert!(result.is_err());
    assert!(AssemblyRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_with_assemblies_cannot_be_deleted(pool: PgPool) {
    let category = AssemblyCategoryRepo::create(&pool, &new_category("Electrical"))
        .await
        .unwrap();
    AssemblyRepo::create(&pool, &new_assembly("Outlet", category.id, &[]))
        .await
        .unwrap();

    let err = AssemblyCategoryRepo::delete(&pool, category.id).await.unwrap_err();
    assert!(is_fk_violation(&err), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Assembly groups
// ---------------------------------------------------------------------------

async fn three_assemblies(pool: &PgPool) -> Vec<i64> {
    let category = AssemblyCategoryRepo::create(pool, &new_category("Doors"))
        .await
        .unwrap();
    let mut ids = Vec::new();
    for name in ["Oak Door", "Pine Door", "Steel Door"] {
        let a = AssemblyRepo::create(pool, &new_assembly(name, category.id, &[]))
            .await
            .unwrap();
        ids.push(a.assembly.id);
    }
    ids
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_items_persist_in_order(pool: PgPool) {
    let ids = three_assemblies(&pool).await;
    let group = AssemblyGroupRepo::create(
        &pool,
        &CreateAssemblyGroup {
            name: "Front Door".to_string(),
            description: None,
            group_type: "CHOOSE_ONE".to_string(),
            category_id: None,
            sort_order: None,
            items: ids
                .iter()
                .enumerate()
                .map(|(i, &id)| group_item(id, i == 0))
                .collect(),
        },
    )
    .await
    .unwrap();

    assert_eq!(group.items.len(), 3);
    assert_eq!(group.items.iter().filter(|i| i.is_default).count(), 1);
    assert_eq!(group.items[0].assembly_name, "Oak Door");
    assert!(group.items.iter().all(|i| i.quantity == 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_quantity_update_and_removal(pool: PgPool) {
    let ids = three_assemblies(&pool).await;
    let mut conflicting = group_item(ids[0], false);
    conflicting.conflicts_with = vec![ids[1]];
    let group = AssemblyGroupRepo::create(
        &pool,
        &CreateAssemblyGroup {
            name: "Hardware".to_string(),
            description: None,
            group_type: "CONFLICT".to_string(),
            category_id: None,
            sort_order: None,
            items: vec![conflicting, group_item(ids[1], false)],
        },
    )
    .await
    .unwrap();
    let group_id = group.group.id;

    let item = AssemblyGroupRepo::update_item_quantity(&pool, group_id, ids[1], 4)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.quantity, 4);

    assert!(AssemblyGroupRepo::update_item_quantity(&pool, group_id, ids[2], 2)
        .await
        .unwrap()
        .is_none());

    assert!(AssemblyGroupRepo::remove_item(&pool, group_id, ids[1]).await.unwrap());
    let items = AssemblyGroupRepo::list_items(&pool, group_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].conflicts_with.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assembly_in_group_cannot_be_deleted(pool: PgPool) {
    let ids = three_assemblies(&pool).await;
    let group = AssemblyGroupRepo::create(
        &pool,
        &CreateAssemblyGroup {
            name: "Optional Extras".to_string(),
            description: None,
            group_type: "OPTIONAL".to_string(),
            category_id: None,
            sort_order: None,
            items: vec![],
        },
    )
    .await
    .unwrap();
    AssemblyGroupRepo::add_item(&pool, group.group.id, &group_item(ids[2], false))
        .await
        .unwrap();

    let err = AssemblyRepo::delete(&pool, ids[2]).await.unwrap_err();
    assert!(is_fk_violation(&err), "got {err:?}");
    assert_eq!(AssemblyRepo::count_group_usages(&pool, ids[2]).await.unwrap(), 1);
}
