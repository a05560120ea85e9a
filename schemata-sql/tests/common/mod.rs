use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn create_sqlite_pool(key: impl Into<String>) -> anyhow::Result<SqlitePool> {
    let key = key.into();
    let dir = "../target/tmp";
    let path = format!("{dir}/test_schemata_sql_{key}.db");

    std::fs::create_dir_all(dir)?;
    let _ = std::fs::remove_file(&path);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    Ok(SqlitePoolOptions::new().connect_with(options).await?)
}
