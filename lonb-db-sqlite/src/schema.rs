diesel::table! {
    locations (rowid) {
        rowid -> BigInt,
        id -> Text,
        user_id -> Text,
        name -> Text,
        lat -> Double,
        lng -> Double,
        description -> Text,
        address -> Nullable<Text>,
        created_at -> BigInt,
    }
}

diesel::table! {
    location_photos (rowid) {
        rowid -> BigInt,
        parent_rowid -> BigInt,
        position -> BigInt,
        public_id -> Text,
        url -> Text,
        original_name -> Text,
        uploaded_at -> BigInt,
    }
}

diesel::joinable!(location_photos -> locations (parent_rowid));

diesel::allow_tables_to_appear_in_same_query!(locations, location_photos);
