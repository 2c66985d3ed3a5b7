use crate::types::KeywordType;
use diesel::prelude::*;

// Ids are assigned by the ingestion process, so every model is insertable as-is.

// Countries //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::countries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Country {
    pub code: String,
    pub name: Option<String>,
    pub regions_count: Option<i32>,
    pub users_count: Option<i32>,
    pub wines_count: Option<i32>,
    pub wineries_count: Option<i32>,
}

// Regions //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::regions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Region {
    pub id: i32,
    pub name: Option<String>,
    pub country_code: Option<String>,
}

// Wineries //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::wineries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Winery {
    pub id: i32,
    pub name: Option<String>,
}

// Wines //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::wines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Wine {
    pub id: i32,
    pub name: Option<String>,
    pub is_natural: Option<bool>,
    pub region_id: Option<i32>,
    pub winery_id: Option<i32>,
    pub ratings_average: Option<f64>,
    pub ratings_count: Option<i32>,
    pub url: Option<String>,
    pub acidity: Option<f64>,
    pub fizziness: Option<f64>,
    pub intensity: Option<f64>,
    pub sweetness: Option<f64>,
    pub tannin: Option<f64>,
    pub user_structure_count: Option<i32>,
}

// Vintages //

/// A specific year's bottling of a [`Wine`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::vintages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Vintage {
    pub id: i32,
    pub name: Option<String>,
    pub wine_id: Option<i32>,
    pub ratings_average: Option<f64>,
    pub ratings_count: Option<i32>,
    pub year: Option<i32>,
    pub price_euros: Option<f64>,
    pub price_discounted_from: Option<f64>,
    pub price_discount_percentage: Option<f64>,
    pub bottle_volume_ml: Option<i32>,
}

// Grapes //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::grapes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Grape {
    pub id: i32,
    pub name: Option<String>,
    pub wines_count: Option<i32>,
}

// Top lists //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::toplists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TopList {
    pub id: i32,
    pub name: Option<String>,
    pub country_code: Option<String>,
}

/// Position of a vintage within a top list, with the previous rank for trends.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::vintage_toplists_rankings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VintageTopListRanking {
    pub id: i32,
    pub top_list_id: Option<i32>,
    pub vintage_id: Option<i32>,
    pub rank: Option<i32>,
    pub previous_rank: Option<i32>,
}

// Most used grapes //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::most_used_grapes_per_country)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MostUsedGrapes {
    pub id: i32,
    pub country_code: Option<String>,
    pub grape_id: Option<i32>,
}

// Keywords //

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::keywords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Keyword {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::keywords_wine)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KeywordsWine {
    pub id: i32,
    pub keyword_type: Option<KeywordType>,
    pub occurrences: Option<i32>,
    pub keyword_id: Option<i32>,
    pub wine_id: Option<i32>,
    pub group_name: Option<String>,
}
