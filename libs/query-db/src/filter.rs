//! Compiled filters → sea_orm::Condition (predicate in, SQL out).
//! Compilation belongs to `query_core`. This module only consumes its `Predicate`
//! and `PageRequest` and runs them through SeaORM.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use query_core::{
    compile_loose_request, compile_strict_request, CompileError, CompileResult, Comparison,
    FieldTypeResolver, Page, PageDataRequest, PageInfo, PageLimits, PageRequest, Predicate,
    PredicateFragment, QueryError, SemanticType, SortDirection, TypedValue,
};
use sea_orm::{
    sea_query::{Alias, Expr, IntoColumnRef, LikeExpr, Order, SimpleExpr},
    ColumnTrait, ColumnType, Condition, ConnectionTrait, EntityTrait, IdenStatic, Iterable,
    PaginatorTrait, PrimaryKeyToColumn, QueryFilter, QueryOrder,
};
use tracing::{debug, trace, warn};

/// Declared type of a SeaORM column, or `None` for types that cannot be filtered.
pub fn semantic_type_of(column_type: &ColumnType) -> Option<SemanticType> {
    match column_type {
        ColumnType::Char(_)
        | ColumnType::String(_)
        | ColumnType::Text
        | ColumnType::Uuid
        | ColumnType::Enum { .. } => Some(SemanticType::String),
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned
        | ColumnType::Float
        | ColumnType::Double
        | ColumnType::Decimal(_)
        | ColumnType::Money(_) => Some(SemanticType::Number),
        ColumnType::Date => Some(SemanticType::Date),
        ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
            Some(SemanticType::DateTime)
        }
        _ => None,
    }
}

/* ---------- naming strategy ---------- */

/// Physical column name for an API field name (`lastName` → `last_name`).
pub fn column_name(api_name: &str) -> String {
    api_name.to_case(Case::Snake)
}

/// API field name for a physical column name (`last_name` → `lastName`).
pub fn api_name(column_name: &str) -> String {
    column_name.to_case(Case::Camel)
}

fn identity_column<E: EntityTrait>() -> Option<E::Column> {
    E::PrimaryKey::iter().next().map(|pk| pk.into_column())
}

/* ---------- field map ---------- */

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub semantic_type: SemanticType,
}

/// Whitelisted, typed fields of one entity. Lookups are case-insensitive.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
    identity: String,
}

impl<E: EntityTrait> FieldMap<E>
where
    E::Column: ColumnTrait + Copy,
{
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            map: HashMap::new(),
            identity: identity.into(),
        }
    }

    /// Register every filterable column of `E` under its camelCase API name and
    /// its column name. The first primary-key column becomes the identity field.
    pub fn from_entity() -> Self {
        let identity = identity_column::<E>()
            .map(|c| api_name(c.as_str()))
            .unwrap_or_else(|| "id".to_string());
        let mut fmap = Self::new(identity);
        for col in E::Column::iter() {
            let def = col.def();
            let Some(ty) = semantic_type_of(def.get_column_type()) else {
                trace!(column = col.as_str(), "column type is not filterable, skipping");
                continue;
            };
            fmap = fmap
                .insert(api_name(col.as_str()), col, ty)
                .insert(col.as_str(), col, ty);
        }
        fmap
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, ty: SemanticType) -> Self {
        self.map.insert(
            api_name.into().to_lowercase(),
            Field {
                col,
                semantic_type: ty,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(&name.to_lowercase())
    }

    fn column(&self, name: &str) -> CompileResult<E::Column> {
        self.get(name)
            .map(|f| f.col)
            .ok_or_else(|| CompileError::unknown_field(name))
    }
}

impl<E: EntityTrait> FieldTypeResolver for FieldMap<E>
where
    E::Column: ColumnTrait + Copy + Send + Sync,
{
    fn semantic_type(&self, field: &str) -> Option<SemanticType> {
        self.get(field).map(|f| f.semantic_type)
    }

    fn identity_field(&self) -> &str {
        &self.identity
    }
}

/* ---------- value + fragment translation ---------- */

fn to_value(v: &TypedValue) -> sea_orm::Value {
    match v {
        TypedValue::String(s) => sea_orm::Value::String(Some(Box::new(s.clone()))),
        TypedValue::Number(n) => sea_orm::Value::Double(Some(*n)),
        TypedValue::Date(d) => sea_orm::Value::ChronoDate(Some(Box::new(*d))),
        TypedValue::DateTime(dt) => sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*dt))),
    }
}

fn fragment_expr<C: IntoColumnRef>(col: C, f: &PredicateFragment) -> SimpleExpr {
    let lhs = Expr::col(col);
    match f.comparison {
        Comparison::Eq => lhs.eq(to_value(&f.value)),
        Comparison::Ne => lhs.ne(to_value(&f.value)),
        Comparison::Gt => lhs.gt(to_value(&f.value)),
        Comparison::Ge => lhs.gte(to_value(&f.value)),
        Comparison::Lt => lhs.lt(to_value(&f.value)),
        Comparison::Le => lhs.lte(to_value(&f.value)),
        Comparison::Like(shape) => {
            lhs.like(LikeExpr::new(shape.pattern(&f.value.canonical())).escape('\\'))
        }
    }
}

/// Strict translation: every field goes through the field map.
pub fn predicate_to_condition<E: EntityTrait>(
    predicate: &Predicate,
    fmap: &FieldMap<E>,
) -> CompileResult<Condition>
where
    E::Column: ColumnTrait + Copy,
{
    predicate
        .fragments()
        .into_iter()
        .try_fold(Condition::all(), |cond, f| -> CompileResult<Condition> {
            Ok(cond.add(fragment_expr(fmap.column(&f.field)?, f)))
        })
}

/// Loose translation: field names become column names by naming strategy only.
/// Unknown columns are left for the database to reject.
pub fn predicate_to_condition_loose(predicate: &Predicate) -> Condition {
    predicate
        .fragments()
        .into_iter()
        .fold(Condition::all(), |cond, f| {
            cond.add(fragment_expr(Alias::new(column_name(&f.field)), f))
        })
}

fn sea_order(dir: SortDirection) -> Order {
    match dir {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/* ---------- Select extensions ---------- */

/// Apply compiled predicates and sort orders to a plain SeaORM `Select<E>`.
pub trait FilterQueryExt<E: EntityTrait>: Sized {
    fn apply_predicate_strict(self, predicate: &Predicate, fmap: &FieldMap<E>)
        -> CompileResult<Self>;

    fn apply_predicate_loose(self, predicate: &Predicate) -> Self;

    fn apply_sort_strict(self, page: &PageRequest, fmap: &FieldMap<E>) -> CompileResult<Self>;

    fn apply_sort_loose(self, page: &PageRequest) -> Self;
}

impl<E> FilterQueryExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_predicate_strict(
        self,
        predicate: &Predicate,
        fmap: &FieldMap<E>,
    ) -> CompileResult<Self> {
        if predicate.is_true() {
            return Ok(self);
        }
        Ok(self.filter(predicate_to_condition(predicate, fmap)?))
    }

    fn apply_predicate_loose(self, predicate: &Predicate) -> Self {
        if predicate.is_true() {
            return self;
        }
        self.filter(predicate_to_condition_loose(predicate))
    }

    fn apply_sort_strict(self, page: &PageRequest, fmap: &FieldMap<E>) -> CompileResult<Self> {
        let mut query = self;
        for order in &page.sort {
            query = query.order_by(fmap.column(&order.field)?, sea_order(order.direction));
        }
        Ok(query)
    }

    fn apply_sort_loose(self, page: &PageRequest) -> Self {
        page.sort.iter().fold(self, |query, order| {
            let col = SimpleExpr::from(Expr::col(Alias::new(column_name(&order.field))));
            query.order_by(col, sea_order(order.direction))
        })
    }
}

/* ---------- pagination ---------- */

async fn fetch_page<E, D, F, C>(
    select: sea_orm::Select<E>,
    conn: &C,
    page: &PageRequest,
    model_to_domain: F,
) -> Result<Page<D>, QueryError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    F: Fn(E::Model) -> D,
    C: ConnectionTrait + Send + Sync,
{
    let paginator = select.paginate(conn, page.size);
    let totals = paginator.num_items_and_pages().await.map_err(|e| {
        warn!(error = %e, "page count query failed");
        QueryError::data_access(e.to_string())
    })?;
    let rows = paginator.fetch_page(page.page).await.map_err(|e| {
        warn!(error = %e, "page fetch query failed");
        QueryError::data_access(e.to_string())
    })?;
    debug!(
        page = page.page,
        size = page.size,
        rows = rows.len(),
        total = totals.number_of_items,
        "fetched page"
    );

    Ok(Page::new(
        rows.into_iter().map(model_to_domain).collect(),
        PageInfo {
            page: page.page,
            size: page.size,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        },
    ))
}

/// Strict one-shot pagination: validate → compile against `fmap` → order →
/// count + fetch. Validation failures are returned before any query runs.
pub async fn paginate_strict<E, D, F, C>(
    select: sea_orm::Select<E>,
    conn: &C,
    req: &PageDataRequest,
    fmap: &FieldMap<E>,
    limits: PageLimits,
    model_to_domain: F,
) -> Result<Page<D>, QueryError>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy + Send + Sync,
    E::Model: Send + Sync,
    F: Fn(E::Model) -> D,
    C: ConnectionTrait + Send + Sync,
{
    let compiled = compile_strict_request(fmap, req, limits)?;
    let page = compiled.page.ensure_tiebreaker(fmap.identity_field());
    let select = select
        .apply_predicate_strict(&compiled.predicate, fmap)?
        .apply_sort_strict(&page, fmap)?;
    fetch_page(select, conn, &page, model_to_domain).await
}

/// Loose one-shot pagination. Field names are not checked against any schema;
/// unknown columns and type mismatches come back as `QueryError::DataAccess`.
pub async fn paginate_loose<E, D, F, C>(
    select: sea_orm::Select<E>,
    conn: &C,
    req: &PageDataRequest,
    limits: PageLimits,
    model_to_domain: F,
) -> Result<Page<D>, QueryError>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: Send + Sync,
    F: Fn(E::Model) -> D,
    C: ConnectionTrait + Send + Sync,
{
    let identity = identity_column::<E>()
        .map(|c| api_name(c.as_str()))
        .unwrap_or_else(|| "id".to_string());
    let compiled = compile_loose_request(&identity, req, limits)?;
    let page = compiled.page.ensure_tiebreaker(&identity);
    let select = select
        .apply_predicate_loose(&compiled.predicate)
        .apply_sort_loose(&page);
    fetch_page(select, conn, &page, model_to_domain).await
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
