// Kept in sync with `ddl::TABLES`, which creates these tables in SQLite.

diesel::table! {
    countries (code) {
        code -> Text,
        name -> Nullable<Text>,
        regions_count -> Nullable<Integer>,
        users_count -> Nullable<Integer>,
        wines_count -> Nullable<Integer>,
        wineries_count -> Nullable<Integer>,
    }
}

diesel::table! {
    grapes (id) {
        id -> Integer,
        name -> Nullable<Text>,
        wines_count -> Nullable<Integer>,
    }
}

diesel::table! {
    keywords (id) {
        id -> Integer,
        name -> Nullable<Text>,
    }
}

diesel::table! {
    keywords_wine (id) {
        id -> Integer,
        keyword_type -> Nullable<Text>,
        #[sql_name = "count"]
        occurrences -> Nullable<Integer>,
        keyword_id -> Nullable<Integer>,
        wine_id -> Nullable<Integer>,
        group_name -> Nullable<Text>,
    }
}

diesel::table! {
    most_used_grapes_per_country (id) {
        id -> Integer,
        country_code -> Nullable<Text>,
        grape_id -> Nullable<Integer>,
    }
}

diesel::table! {
    regions (id) {
        id -> Integer,
        name -> Nullable<Text>,
        country_code -> Nullable<Text>,
    }
}

diesel::table! {
    toplists (id) {
        id -> Integer,
        name -> Nullable<Text>,
        country_code -> Nullable<Text>,
    }
}

diesel::table! {
    vintage_toplists_rankings (id) {
        id -> Integer,
        top_list_id -> Nullable<Integer>,
        vintage_id -> Nullable<Integer>,
        rank -> Nullable<Integer>,
        previous_rank -> Nullable<Integer>,
    }
}

diesel::table! {
    vintages (id) {
        id -> Integer,
        name -> Nullable<Text>,
        wine_id -> Nullable<Integer>,
        ratings_average -> Nullable<Double>,
        ratings_count -> Nullable<Integer>,
        year -> Nullable<Integer>,
        price_euros -> Nullable<Double>,
        price_discounted_from -> Nullable<Double>,
        price_discount_percentage -> Nullable<Double>,
        bottle_volume_ml -> Nullable<Integer>,
    }
}

diesel::table! {
    wineries (id) {
        id -> Integer,
        name -> Nullable<Text>,
    }
}

diesel::table! {
    wines (id) {
        id -> Integer,
        name -> Nullable<Text>,
        is_natural -> Nullable<Bool>,
        region_id -> Nullable<Integer>,
        winery_id -> Nullable<Integer>,
        ratings_average -> Nullable<Double>,
        ratings_count -> Nullable<Integer>,
        url -> Nullable<Text>,
        acidity -> Nullable<Double>,
        fizziness -> Nullable<Double>,
        intensity -> Nullable<Double>,
        sweetness -> Nullable<Double>,
        tannin -> Nullable<Double>,
        user_structure_count -> Nullable<Integer>,
    }
}

diesel::joinable!(keywords_wine -> keywords (keyword_id));
diesel::joinable!(keywords_wine -> wines (wine_id));
diesel::joinable!(most_used_grapes_per_country -> countries (country_code));
diesel::joinable!(most_used_grapes_per_country -> grapes (grape_id));
diesel::joinable!(regions -> countries (country_code));
diesel::joinable!(toplists -> countries (country_code));
diesel::joinable!(vintage_toplists_rankings -> toplists (top_list_id));
diesel::joinable!(vintage_toplists_rankings -> vintages (vintage_id));
diesel::joinable!(vintages -> wines (wine_id));
diesel::joinable!(wines -> regions (region_id));
diesel::joinable!(wines -> wineries (winery_id));

diesel::allow_tables_to_appear_in_same_query!(
    countries,
    grapes,
    keywords,
    keywords_wine,
    most_used_grapes_per_country,
    regions,
    toplists,
    vintage_toplists_rankings,
    vintages,
    wineries,
    wines,
);
