//! Both entry points against a fresh in-memory SQLite database.
#![cfg(feature = "sqlite")]

use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set};

use query_core::{
    CompileError, FilterRequest, Operation, PageDataRequest, PageLimits, QueryError,
    SortDirection,
};
use query_db::{paginate_loose, paginate_strict, FieldMap};

mod person {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "person")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        pub last_name: String,
        pub civil_status: i32,
        pub birth_date: Date,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

use person::{ActiveModel, Entity, Model};

fn row(id: i64, name: &str, last_name: &str, civil_status: i32, born: (i32, u32, u32)) -> ActiveModel {
    ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        last_name: Set(last_name.to_string()),
        civil_status: Set(civil_status),
        birth_date: Set(NaiveDate::from_ymd_opt(born.0, born.1, born.2).unwrap()),
    }
}

async fn seeded_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(Entity)))
        .await?;

    Entity::insert_many([
        row(1, "Ana", "Surname 10", 1, (1990, 1, 1)),
        row(2, "Bruno", "Lastname 11", 2, (1985, 6, 15)),
        row(3, "Ana", "Lastname 2", 1, (2001, 3, 9)),
        row(4, "Carla", "Lastname 3", 3, (1979, 12, 31)),
        row(5, "Diego", "Other", 2, (1995, 5, 5)),
    ])
    .exec(&db)
    .await?;
    Ok(db)
}

fn ids(models: &[Model]) -> Vec<i64> {
    let mut v: Vec<_> = models.iter().map(|m| m.id).collect();
    v.sort_unstable();
    v
}

fn filtered(f: FilterRequest) -> PageDataRequest {
    PageDataRequest::new(0, 10).with_filter(f)
}

#[tokio::test]
async fn malformed_number_fails_strict_only() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = filtered(FilterRequest::new("civilStatus", "ABC", Operation::Eq));

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await;
    assert!(matches!(
        strict,
        Err(QueryError::Compile(CompileError::Coercion { .. }))
    ));

    // deferred to the executor; SQLite's type affinity simply finds nothing
    match paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await {
        Ok(page) => assert!(page.items.is_empty()),
        Err(e) => assert!(!e.is_validation(), "{e}"),
    }
    Ok(())
}

#[tokio::test]
async fn substring_match_agrees_on_both_paths() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req: PageDataRequest = filtered(FilterRequest::new("lastName", "ame 1", Operation::Contains));

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await?;
    let loose = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await?;

    assert_eq!(ids(&strict.items), vec![1, 2]);
    assert_eq!(ids(&loose.items), vec![1, 2]);
    assert_eq!(strict.page_info.total_items, 2);
    Ok(())
}

#[tokio::test]
async fn like_on_number_field_fails_strict_only() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = filtered(FilterRequest::new("civilStatus", "1", Operation::StartsWith));

    let err = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Number type doesn't allow like operations.");

    if let Err(e) = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await {
        assert!(!e.is_validation(), "{e}");
    }
    Ok(())
}

#[tokio::test]
async fn two_key_sort_gives_deterministic_single_row_pages() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();

    for (page, expected) in [(0, 3), (1, 1), (2, 2)] {
        let req = PageDataRequest::new(page, 1).with_sort(SortDirection::Asc, &["name", "lastName"]);
        let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await?;
        let loose = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await?;
        assert_eq!(strict.items.len(), 1);
        assert_eq!(strict.items[0].id, expected);
        assert_eq!(loose.items[0].id, expected);
        assert_eq!(strict.page_info.total_items, 5);
        assert_eq!(strict.page_info.total_pages, 5);
    }
    Ok(())
}

#[tokio::test]
async fn no_filters_match_all_rows_by_identity() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = PageDataRequest::new(0, 10);

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m.id).await?;
    let loose = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m.id).await?;
    assert_eq!(strict.items, vec![1, 2, 3, 4, 5]);
    assert_eq!(loose.items, vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[tokio::test]
async fn unknown_field_diverges() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = filtered(FilterRequest::new("nickName", "x", Operation::Eq));

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await;
    assert!(matches!(
        strict,
        Err(QueryError::Compile(CompileError::UnknownField(_)))
    ));

    let loose = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await;
    assert!(matches!(loose, Err(QueryError::DataAccess(_))));
    Ok(())
}

#[tokio::test]
async fn date_and_number_comparisons() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = PageDataRequest::new(0, 10)
        .with_filter(FilterRequest::new("birthDate", "1989-12-31", Operation::Get))
        .with_filter(FilterRequest::new("civilStatus", "2", Operation::Let));

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await?;
    assert_eq!(ids(&strict.items), vec![1, 3, 5]);

    let only_dates = filtered(FilterRequest::new("birthDate", "1989-12-31", Operation::Get));
    let loose = paginate_loose(Entity::find(), &db, &only_dates, PageLimits::default(), |m| m).await?;
    assert_eq!(ids(&loose.items), vec![1, 3, 5]);
    Ok(())
}

#[tokio::test]
async fn page_size_is_clamped() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let limits = PageLimits { default: 2, max: 2 };
    let page = paginate_strict(Entity::find(), &db, &PageDataRequest::new(0, 50), &fmap, limits, |m| m).await?;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page_info.size, 2);
    assert_eq!(page.page_info.total_pages, 3);
    Ok(())
}

#[tokio::test]
async fn huge_page_index_is_rejected_before_querying() -> Result<()> {
    let db = seeded_db().await?;
    let fmap = FieldMap::<Entity>::from_entity();
    let req = PageDataRequest::new(1_844_674_407_370_955_162, 10);

    let strict = paginate_strict(Entity::find(), &db, &req, &fmap, PageLimits::default(), |m| m).await;
    assert!(matches!(
        strict,
        Err(QueryError::Compile(CompileError::InvalidRequest { ref field, .. })) if field == "page"
    ));

    let loose = paginate_loose(Entity::find(), &db, &req, PageLimits::default(), |m| m).await;
    assert!(matches!(loose, Err(e) if e.is_validation()));
    Ok(())
}
