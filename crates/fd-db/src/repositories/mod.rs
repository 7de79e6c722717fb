// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).
// Functions that must run an ownership guard before the mutation take a
// `&mut PgConnection` instead, so the guard and the write share one connection.

pub mod card;
pub mod deck;
pub mod session;
pub mod stats;
