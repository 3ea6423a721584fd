//! SQL text for the Postgres backend.
//!
//! All documents live in one `document` table keyed by `(collection, id)`.
//! Parameters are always bound, never interpolated; only the operator
//! symbol of range filters is spliced in, and it comes from a closed enum.

use crate::filter::Operator;

pub const GET: &str =
    "SELECT id, created_at, fields FROM document WHERE collection = $1 AND id = $2";

pub const GET_ALL: &str =
    "SELECT id, created_at, fields FROM document WHERE collection = $1 ORDER BY created_at, id";

/// Inserts a document, filling `timestamp` from the database clock when the
/// caller left it out or set it to null. `created_at` and the filled-in
/// timestamp are the same instant.
pub const INSERT: &str = "INSERT INTO document (collection, fields, created_at) \
SELECT $1, CASE WHEN COALESCE(jsonb_typeof($2::jsonb -> 'timestamp'), 'null') = 'null' \
THEN $2::jsonb || jsonb_build_object('timestamp', clock.ts) ELSE $2::jsonb END, clock.ts \
FROM (SELECT clock_timestamp() AS ts) AS clock RETURNING id";

pub const UPDATE: &str =
    "UPDATE document SET fields = fields || $3::jsonb WHERE collection = $1 AND id = $2";

pub const DELETE: &str = "DELETE FROM document WHERE collection = $1 AND id = $2";

pub const COUNT: &str = "SELECT count(*) FROM document WHERE collection = $1";

pub const FIRST_PAGE: &str = "SELECT id, created_at, fields FROM document WHERE collection = $1 \
ORDER BY created_at DESC, id DESC LIMIT $2";

pub const NEXT_PAGE: &str = "SELECT id, created_at, fields FROM document WHERE collection = $1 \
AND (created_at, id) < ($2::timestamptz, $3::text) ORDER BY created_at DESC, id DESC LIMIT $4";

/// `SELECT` for a single-field filter. Binds `$1` collection, `$2` field
/// name, `$3` the JSON value.
pub fn query(op: Operator) -> String {
    format!(
        "SELECT id, created_at, fields FROM document WHERE collection = $1 AND {} ORDER BY created_at, id",
        predicate(op)
    )
}

/// The `WHERE` predicate for one operator.
///
/// Guards that must run before a cast or a set-returning call sit inside
/// `CASE`, since Postgres does not promise `AND` evaluation order.
pub fn predicate(op: Operator) -> String {
    const FIELD: &str = "fields -> $2::text";
    match op {
        Operator::Eq => format!("{FIELD} = $3::jsonb"),
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
            let sym = op.as_str();
            format!(
                "CASE WHEN jsonb_typeof({FIELD}) <> jsonb_typeof($3::jsonb) THEN false \
WHEN jsonb_typeof($3::jsonb) = 'string' THEN (fields ->> $2::text) COLLATE \"C\" {sym} ($3::jsonb #>> '{{}}') COLLATE \"C\" \
ELSE {FIELD} {sym} $3::jsonb END"
            )
        }
        Operator::ArrayContains => format!(
            "CASE WHEN jsonb_typeof({FIELD}) = 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements({FIELD}) AS item(value) \
WHERE item.value = $3::jsonb) ELSE false END"
        ),
        Operator::ArrayContainsAny => format!(
            "CASE WHEN jsonb_typeof({FIELD}) = 'array' THEN EXISTS (SELECT 1 FROM jsonb_array_elements({FIELD}) AS item(value) \
JOIN jsonb_array_elements($3::jsonb) AS wanted(value) ON item.value = wanted.value) ELSE false END"
        ),
        Operator::In => format!(
            "EXISTS (SELECT 1 FROM jsonb_array_elements($3::jsonb) AS wanted(value) WHERE wanted.value = {FIELD})"
        ),
        Operator::NotIn => format!(
            "fields ? $2::text AND {FIELD} <> 'null'::jsonb AND NOT EXISTS (SELECT 1 FROM jsonb_array_elements($3::jsonb) AS wanted(value) \
WHERE wanted.value = {FIELD})"
        ),
    }
}

#[cfg(test)]
mod tests;
