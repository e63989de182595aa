/// Idempotent DDL applied every time a store is opened.
pub(crate) const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name              TEXT    NOT NULL,
    email                  TEXT    UNIQUE,
    preferred_language     TEXT    NOT NULL DEFAULT 'en',
    trust_score            INTEGER NOT NULL DEFAULT 5,
    contribution_count     INTEGER NOT NULL DEFAULT 0,
    verified_contributions INTEGER NOT NULL DEFAULT 0,
    user_role              TEXT    NOT NULL DEFAULT 'general',
    auth_provider          TEXT,
    provider_id            TEXT,
    created_at             TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS locations_base (
    base_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT    NOT NULL,
    address      TEXT,
    latitude     REAL    NOT NULL,
    longitude    REAL    NOT NULL,
    source_name  TEXT,
    source_id    TEXT,
    is_official  INTEGER NOT NULL DEFAULT 1,
    last_updated TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_locations_base_source
    ON locations_base (source_name, source_id);

CREATE TABLE IF NOT EXISTS locations_ugc (
    ugc_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users (user_id),
    name          TEXT    NOT NULL,
    address_input TEXT,
    latitude      REAL    NOT NULL,
    longitude     REAL    NOT NULL,
    created_at    TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS locations_merged (
    location_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    base_id             INTEGER REFERENCES locations_base (base_id),
    ugc_id              INTEGER REFERENCES locations_ugc (ugc_id),
    display_name        TEXT    NOT NULL,
    address             TEXT,
    latitude            REAL    NOT NULL,
    longitude           REAL    NOT NULL,
    source_type         TEXT    NOT NULL CHECK (source_type IN ('api', 'admin', 'user')),
    verification_status TEXT    NOT NULL CHECK (verification_status IN ('red', 'yellow', 'green')),
    verification_score  REAL    NOT NULL DEFAULT 0,
    auto_verified       INTEGER NOT NULL DEFAULT 0,
    admin_verified      INTEGER NOT NULL DEFAULT 0,
    creator_user_id     INTEGER REFERENCES users (user_id),
    creator_trust_score INTEGER,
    is_deleted          INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT    NOT NULL,
    CHECK ((base_id IS NULL) <> (ugc_id IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_locations_merged_listing
    ON locations_merged (is_deleted, verification_score DESC, created_at DESC);

CREATE TABLE IF NOT EXISTS amenities (
    amenity_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id    INTEGER NOT NULL UNIQUE REFERENCES locations_merged (location_id),
    western_style  INTEGER NOT NULL DEFAULT 0,
    japanese_style INTEGER NOT NULL DEFAULT 0,
    accessible     INTEGER NOT NULL DEFAULT 0,
    baby_changing  INTEGER NOT NULL DEFAULT 0,
    warm_seat      INTEGER NOT NULL DEFAULT 0,
    gender_type    TEXT    NOT NULL DEFAULT 'mixed'
);

CREATE TABLE IF NOT EXISTS reviews (
    review_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id       INTEGER NOT NULL REFERENCES locations_merged (location_id),
    user_id           INTEGER NOT NULL REFERENCES users (user_id),
    review_text       TEXT    NOT NULL,
    cleanliness_score INTEGER,
    wait_time_score   INTEGER,
    user_trust_score  INTEGER NOT NULL,
    is_deleted        INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT    NOT NULL,
    updated_at        TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_location
    ON reviews (location_id, is_deleted, created_at DESC);

CREATE TABLE IF NOT EXISTS review_images (
    image_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id   INTEGER NOT NULL REFERENCES reviews (review_id),
    image_url   TEXT    NOT NULL,
    uploaded_at TEXT    NOT NULL,
    is_deleted  INTEGER NOT NULL DEFAULT 0
);
"#;

/// Tables a caller may ask [`super::SqliteStore::row_count`] about.
pub(crate) const TABLES: &[&str] = &[
    "users",
    "locations_base",
    "locations_ugc",
    "locations_merged",
    "amenities",
    "reviews",
    "review_images",
];
