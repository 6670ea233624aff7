// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order reconciliation and read queries.
//!
//! Reconciliation is the upsert engine: every fetched batch is applied in
//! one transaction, keyed by `(channel_id, external_order_id)` for orders
//! and `(order_id, external_item_id)` for items. Replaying an unchanged
//! batch is a no-op.

use rusqlite::{OptionalExtension, params};
use umos_core::{NormalizedOrder, Order, OrderItem, UmosError};

use crate::database::{Database, map_tr_err};
use crate::queries::{format_ts, parse_ts};

const ORDER_COLUMNS: &str = "id, channel_id, external_order_id, channel_type, order_date, \
                             total_amount, recipient_name, recipient_phone, shipping_address, \
                             status, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, external_item_id, product_name, quantity, unit_price, \
                            courier_code, tracking_number, status, created_at, updated_at";

fn row_to_order(row: &rusqlite::Row<'_>) -> Result<Order, rusqlite::Error> {
    Ok(Order {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        external_order_id: row.get(2)?,
        channel_type: row.get(3)?,
        order_date: parse_ts(4, row.get(4)?)?,
        total_amount: row.get(5)?,
        recipient_name: row.get(6)?,
        recipient_phone: row.get(7)?,
        shipping_address: row.get(8)?,
        status: row.get(9)?,
        created_at: parse_ts(10, row.get(10)?)?,
        updated_at: parse_ts(11, row.get(11)?)?,
    })
}

fn row_to_item(row: &rusqlite::Row<'_>) -> Result<OrderItem, rusqlite::Error> {
    Ok(OrderItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        external_item_id: row.get(2)?,
        product_name: row.get(3)?,
        quantity: row.get(4)?,
        unit_price: row.get(5)?,
        courier_code: row.get(6)?,
        tracking_number: row.get(7)?,
        status: row.get(8)?,
        created_at: parse_ts(9, row.get(9)?)?,
        updated_at: parse_ts(10, row.get(10)?)?,
    })
}

/// Upsert a batch of normalized orders inside a single transaction.
///
/// Each order is matched by `(channel_id, external_order_id)`: found rows
/// have their mutable fields updated in place, new rows are inserted. The
/// same rule applies per item via `(order_id, external_item_id)`. A
/// failure anywhere rolls the whole batch back -- partial application is
/// forbidden. Returns the number of orders applied.
pub async fn reconcile_orders(
    db: &Database,
    orders: Vec<NormalizedOrder>,
) -> Result<usize, UmosError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut applied = 0usize;

            for order in &orders {
                let existing: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM orders
                         WHERE channel_id = ?1 AND external_order_id = ?2",
                        params![order.channel_id, order.external_order_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                let order_id = match existing {
                    Some(id) => {
                        tx.execute(
                            "UPDATE orders SET
                                 channel_type     = ?1,
                                 order_date       = ?2,
                                 total_amount     = ?3,
                                 recipient_name   = ?4,
                                 recipient_phone  = ?5,
                                 shipping_address = ?6,
                                 status           = ?7,
                                 updated_at       = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                             WHERE id = ?8",
                            params![
                                order.channel_type,
                                format_ts(&order.order_date),
                                order.total_amount,
                                order.recipient_name,
                                order.recipient_phone,
                                order.shipping_address,
                                order.status,
                                id,
                            ],
                        )?;
                        id
                    }
                    None => {
                        tx.execute(
                            "INSERT INTO orders (channel_id, external_order_id, channel_type,
                                 order_date, total_amount, recipient_name, recipient_phone,
                                 shipping_address, status)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                            params![
                                order.channel_id,
                                order.external_order_id,
                                order.channel_type,
                                format_ts(&order.order_date),
                                order.total_amount,
                                order.recipient_name,
                                order.recipient_phone,
                                order.shipping_address,
                                order.status,
                            ],
                        )?;
                        tx.last_insert_rowid()
                    }
                };

                for item in &order.items {
                    let existing_item: Option<i64> = tx
                        .query_row(
                            "SELECT id FROM order_items
                             WHERE order_id = ?1 AND external_item_id = ?2",
                            params![order_id, item.external_item_id],
                            |row| row.get(0),
                        )
                        .optional()?;

                    match existing_item {
                        Some(item_id) => {
                            tx.execute(
                                "UPDATE order_items SET
                                     product_name    = ?1,
                                     quantity        = ?2,
                                     unit_price      = ?3,
                                     courier_code    = ?4,
                                     tracking_number = ?5,
                                     status          = ?6,
                                     updated_at      = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                                 WHERE id = ?7",
                                params![
                                    item.product_name,
                                    item.quantity,
                                    item.unit_price,
                                    item.courier_code,
                                    item.tracking_number,
                                    item.status,
                                    item_id,
                                ],
                            )?;
                        }
                        None => {
                            tx.execute(
                                "INSERT INTO order_items (order_id, external_item_id,
                                     product_name, quantity, unit_price, courier_code,
                                     tracking_number, status)
                                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                                params![
                                    order_id,
                                    item.external_item_id,
                                    item.product_name,
                                    item.quantity,
                                    item.unit_price,
                                    item.courier_code,
                                    item.tracking_number,
                                    item.status,
                                ],
                            )?;
                        }
                    }
                }

                applied += 1;
            }

            tx.commit()?;
            Ok(applied)
        })
        .await
        .map_err(map_tr_err)
}

/// List persisted orders, most recent order date first.
pub async fn list_orders(db: &Database, limit: i64, offset: i64) -> Result<Vec<Order>, UmosError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders
                 ORDER BY order_date DESC, id DESC LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt.query_map(params![limit, offset], row_to_order)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(orders)
        })
        .await
        .map_err(map_tr_err)
}

/// Look up one order by its natural key.
pub async fn get_order(
    db: &Database,
    channel_id: i64,
    external_order_id: &str,
) -> Result<Option<Order>, UmosError> {
    let external_order_id = external_order_id.to_string();
    db.connection()
        .call(move |conn| {
            let order = conn
                .query_row(
                    &format!(
                        "SELECT {ORDER_COLUMNS} FROM orders
                         WHERE channel_id = ?1 AND external_order_id = ?2"
                    ),
                    params![channel_id, external_order_id],
                    row_to_order,
                )
                .optional()?;
            Ok(order)
        })
        .await
        .map_err(map_tr_err)
}

/// Items belonging to one order.
pub async fn get_order_items(db: &Database, order_id: i64) -> Result<Vec<OrderItem>, UmosError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![order_id], row_to_item)?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::channels::{self, NewChannel};
    use chrono::{TimeZone, Utc};
    use umos_core::NormalizedOrderItem;

    async fn setup_db_with_channel() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let channel = channels::create_channel(
            &db,
            NewChannel {
                name: "mock-store".to_string(),
                provider_type: "mock".to_string(),
                api_key: "ct-key".to_string(),
                api_secret: "ct-secret".to_string(),
            },
        )
        .await
        .unwrap();
        (db, channel.id)
    }

    fn sample_order(channel_id: i64, external_order_id: &str) -> NormalizedOrder {
        NormalizedOrder {
            channel_id,
            channel_type: "mock".to_string(),
            external_order_id: external_order_id.to_string(),
            order_date: Utc.with_ymd_and_hms(2026, 8, 1, 9, 30, 0).unwrap(),
            total_amount: 32000.0,
            recipient_name: "Kim Jiwoo".to_string(),
            recipient_phone: "010-1234-5678".to_string(),
            shipping_address: "12 Teheran-ro, Gangnam-gu, Seoul".to_string(),
            status: "PAYMENT_COMPLETE".to_string(),
            items: vec![
                NormalizedOrderItem {
                    external_item_id: "I-1".to_string(),
                    product_name: "mock product A".to_string(),
                    quantity: 2,
                    unit_price: 12000.0,
                    courier_code: None,
                    tracking_number: None,
                    status: "PAYMENT_COMPLETE".to_string(),
                },
                NormalizedOrderItem {
                    external_item_id: "I-2".to_string(),
                    product_name: "mock product B".to_string(),
                    quantity: 1,
                    unit_price: 8000.0,
                    courier_code: None,
                    tracking_number: None,
                    status: "PAYMENT_COMPLETE".to_string(),
                },
            ],
        }
    }

    async fn count_rows(db: &Database, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        db.connection()
            .call(move |conn| {
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok::<_, rusqlite::Error>(count)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reconcile_inserts_orders_and_items() {
        let (db, channel_id) = setup_db_with_channel().await;

        let applied = reconcile_orders(&db, vec![sample_order(channel_id, "O-1001")])
            .await
            .unwrap();
        assert_eq!(applied, 1);

        let order = get_order(&db, channel_id, "O-1001").await.unwrap().unwrap();
        assert_eq!(order.status, "PAYMENT_COMPLETE");
        assert_eq!(order.total_amount, 32000.0);

        let items = get_order_items(&db, order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].external_item_id, "I-1");
        assert!(items[0].tracking_number.is_none());
    }

    #[tokio::test]
    async fn reconcile_twice_produces_no_duplicates() {
        let (db, channel_id) = setup_db_with_channel().await;
        let batch = vec![sample_order(channel_id, "O-1001")];

        reconcile_orders(&db, batch.clone()).await.unwrap();
        reconcile_orders(&db, batch).await.unwrap();

        assert_eq!(count_rows(&db, "orders").await, 1);
        assert_eq!(count_rows(&db, "order_items").await, 2);
    }

    #[tokio::test]
    async fn reconcile_updates_existing_and_inserts_new_in_one_batch() {
        let (db, channel_id) = setup_db_with_channel().await;
        reconcile_orders(&db, vec![sample_order(channel_id, "O-1001")])
            .await
            .unwrap();

        let mut updated = sample_order(channel_id, "O-1001");
        updated.status = "SHIPPING_PREPARE".to_string();
        updated.items[0].courier_code = Some("CJGLS".to_string());
        updated.items[0].tracking_number = Some("6789-0000".to_string());
        let fresh = sample_order(channel_id, "O-1002");

        let applied = reconcile_orders(&db, vec![updated, fresh]).await.unwrap();
        assert_eq!(applied, 2);
        assert_eq!(count_rows(&db, "orders").await, 2);
        assert_eq!(count_rows(&db, "order_items").await, 4);

        let order = get_order(&db, channel_id, "O-1001").await.unwrap().unwrap();
        assert_eq!(order.status, "SHIPPING_PREPARE");
        let items = get_order_items(&db, order.id).await.unwrap();
        assert_eq!(items[0].courier_code.as_deref(), Some("CJGLS"));
        assert_eq!(items[0].tracking_number.as_deref(), Some("6789-0000"));
    }

    #[tokio::test]
    async fn same_external_order_id_on_other_channel_is_a_separate_order() {
        let (db, channel_id) = setup_db_with_channel().await;
        let other = channels::create_channel(
            &db,
            NewChannel {
                name: "second-store".to_string(),
                provider_type: "mock".to_string(),
                api_key: "ct".to_string(),
                api_secret: "ct".to_string(),
            },
        )
        .await
        .unwrap();

        reconcile_orders(&db, vec![sample_order(channel_id, "O-1001")])
            .await
            .unwrap();
        reconcile_orders(&db, vec![sample_order(other.id, "O-1001")])
            .await
            .unwrap();

        assert_eq!(count_rows(&db, "orders").await, 2);
    }

    #[tokio::test]
    async fn failed_batch_rolls_back_completely() {
        let (db, channel_id) = setup_db_with_channel().await;

        // Second order violates the channel foreign key, so the whole
        // batch must be discarded including the valid first order.
        let batch = vec![
            sample_order(channel_id, "O-1001"),
            sample_order(999_999, "O-2001"),
        ];
        let result = reconcile_orders(&db, batch).await;
        assert!(matches!(result, Err(UmosError::Storage { .. })));

        assert_eq!(count_rows(&db, "orders").await, 0);
        assert_eq!(count_rows(&db, "order_items").await, 0);
    }

    #[tokio::test]
    async fn list_orders_returns_most_recent_first() {
        let (db, channel_id) = setup_db_with_channel().await;
        let mut older = sample_order(channel_id, "O-OLD");
        older.order_date = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let newer = sample_order(channel_id, "O-NEW");
        reconcile_orders(&db, vec![older, newer]).await.unwrap();

        let orders = list_orders(&db, 10, 0).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].external_order_id, "O-NEW");
        assert_eq!(orders[1].external_order_id, "O-OLD");
    }
}
