//! Success envelopes: `{ "data": ... }` for one record, `{ "data": [...], "meta": {...} }` for lists.

use crate::model::Page;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// Paging window the rows were read with, plus how many came back.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ListMeta {
    pub count: usize,
    pub skip: u32,
    pub limit: u32,
}

pub type One<T> = (StatusCode, Json<Envelope<T>>);

/// 201 with the newly stored record.
pub fn created<T: Serialize>(data: T) -> One<T> {
    (StatusCode::CREATED, Json(Envelope { data }))
}

pub fn ok<T: Serialize>(data: T) -> One<T> {
    (StatusCode::OK, Json(Envelope { data }))
}

pub fn listed<T: Serialize>(rows: Vec<T>, page: Page) -> (StatusCode, Json<ListEnvelope<T>>) {
    let meta = ListMeta {
        count: rows.len(),
        skip: page.skip,
        limit: page.limit,
    };
    (StatusCode::OK, Json(ListEnvelope { data: rows, meta }))
}
