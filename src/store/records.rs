// src/store/records.rs

use crate::domain::product::Product;
use crate::errors::TrackerError;
use crate::store::connection::Database;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

/// Reads the full canonical collection, ordered by id.
///
/// A corrupt blob is skipped with a warning rather than failing the read;
/// one bad row must never take the whole inventory down with it.
pub fn read_all(db: &Database) -> Result<Vec<Product>, TrackerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT id, body FROM products ORDER BY id")
            .map_err(|e| TrackerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| TrackerError::DbError(e.to_string()))?;

        let mut products = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|e| TrackerError::DbError(e.to_string()))?;
            match serde_json::from_str::<Product>(&body) {
                Ok(product) => products.push(product),
                Err(e) => eprintln!("Skipping corrupt product blob {id}: {e}"),
            }
        }
        Ok(products)
    })
}

/// Replaces the full collection in one transaction: clear, insert, commit,
/// or nothing at all. Duplicate ids within `products` collapse
/// last-write-wins through the primary key.
pub fn write_all(db: &Database, products: &[Product]) -> Result<(), TrackerError> {
    let now = Utc::now();

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| TrackerError::DbError(e.to_string()))?;

        tx.execute("DELETE FROM products", [])
            .map_err(|e| TrackerError::DbError(e.to_string()))?;

        for product in products {
            let body = serde_json::to_string(product)
                .map_err(|e| TrackerError::DbError(e.to_string()))?;
            tx.execute(
                "INSERT OR REPLACE INTO products (id, body, updated_at) VALUES (?1, ?2, ?3)",
                params![product.id, body, now],
            )
            .map_err(|e| TrackerError::DbError(e.to_string()))?;
        }

        tx.commit().map_err(|e| TrackerError::DbError(e.to_string()))
    })
}

/// Fetch one record by id.
pub fn get(db: &Database, id: &str) -> Result<Option<Product>, TrackerError> {
    db.with_conn(|conn| {
        let body: Option<String> = conn
            .query_row("SELECT body FROM products WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| TrackerError::DbError(e.to_string()))?;

        match body {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| TrackerError::DbError(format!("Corrupt product blob {id}: {e}"))),
            None => Ok(None),
        }
    })
}

/// Insert or overwrite one record.
pub fn put(db: &Database, product: &Product) -> Result<(), TrackerError> {
    let now = Utc::now();
    let body =
        serde_json::to_string(product).map_err(|e| TrackerError::DbError(e.to_string()))?;

    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO products (id, body, updated_at) VALUES (?1, ?2, ?3)",
            params![product.id, body, now],
        )
        .map_err(|e| TrackerError::DbError(e.to_string()))?;
        Ok(())
    })
}

/// Delete one record. Errors with `NotFound` when the id is unknown.
pub fn delete(db: &Database, id: &str) -> Result<(), TrackerError> {
    db.with_conn(|conn| {
        let affected = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(|e| TrackerError::DbError(e.to_string()))?;
        if affected == 0 {
            return Err(TrackerError::NotFound);
        }
        Ok(())
    })
}
