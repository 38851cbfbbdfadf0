//! Storage mapping descriptors and value conversions.
//!
//! Entities in `blogstore-core` know nothing about tables or columns. This
//! module declares where each field lands and how the one converted field
//! (`Blog::is_active`) is encoded, then checks the whole configuration once at
//! startup so an incomplete or contradictory mapping never reaches a write.

use std::collections::HashSet;

use blogstore_core::domain::{Blog, Post};
use blogstore_core::validation::{FieldConstraint, Validatable};
use thiserror::Error;

/// Lossless two-way conversion between a boolean and two sentinel strings.
///
/// Decoding is total: only an exact match of `when_true` yields `true`,
/// every other stored value yields `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolText {
    pub when_true: &'static str,
    pub when_false: &'static str,
}

impl BoolText {
    pub const fn new(when_true: &'static str, when_false: &'static str) -> Self {
        Self {
            when_true,
            when_false,
        }
    }

    pub fn encode(&self, value: bool) -> &'static str {
        if value { self.when_true } else { self.when_false }
    }

    pub fn decode(&self, stored: &str) -> bool {
        stored == self.when_true
    }
}

/// Encoding of `Blog::is_active` in `blogs.is_active`.
pub const IS_ACTIVE: BoolText = BoolText::new("Blog is active", "Blog is not active");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub column: &'static str,
    /// Storage length limit for string columns.
    pub max_length: Option<usize>,
    pub nullable: bool,
    pub conversion: Option<BoolText>,
}

impl ColumnMapping {
    pub const fn new(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            max_length: None,
            nullable: false,
            conversion: None,
        }
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn converted(mut self, conversion: BoolText) -> Self {
        self.conversion = Some(conversion);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct EntityMapping {
    pub entity: &'static str,
    pub table: &'static str,
    pub primary_key: Option<&'static str>,
    pub columns: &'static [ColumnMapping],
    pub foreign_keys: &'static [ForeignKeyMapping],
    /// Entity-level constraints the storage limits must agree with.
    pub constraints: &'static [FieldConstraint],
}

impl EntityMapping {
    /// Every physical column of the table, primary key first.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.primary_key
            .into_iter()
            .chain(self.foreign_keys.iter().map(|fk| fk.column))
            .chain(self.columns.iter().map(|c| c.column))
            .collect()
    }
}

pub const BLOG_MAPPING: EntityMapping = EntityMapping {
    entity: Blog::ENTITY,
    table: "blogs",
    primary_key: Some("blog_id"),
    columns: &[
        ColumnMapping::new("name", "name").max_length(50),
        ColumnMapping::new("is_active", "is_active").converted(IS_ACTIVE),
    ],
    foreign_keys: &[],
    constraints: Blog::CONSTRAINTS,
};

/// Posts hold exactly one relationship to blogs, through `blog_id`.
pub const POST_MAPPING: EntityMapping = EntityMapping {
    entity: Post::ENTITY,
    table: "articles",
    primary_key: Some("post_id"),
    columns: &[
        ColumnMapping::new("name", "name").max_length(50),
        ColumnMapping::new("content", "content").max_length(1000),
        ColumnMapping::new("created", "created"),
        ColumnMapping::new("updated", "updated").nullable(),
    ],
    foreign_keys: &[ForeignKeyMapping {
        field: "blog_id",
        column: "blog_id",
        references_table: "blogs",
        references_column: "blog_id",
        cascade_delete: true,
    }],
    constraints: Post::CONSTRAINTS,
};

pub const MAPPINGS: &[EntityMapping] = &[BLOG_MAPPING, POST_MAPPING];

/// Invalid mapping configuration. Fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("entity {entity} has no primary key declared")]
    MissingPrimaryKey { entity: &'static str },

    #[error("table {table} is mapped more than once")]
    DuplicateTable { table: &'static str },

    #[error("column {table}.{column} is mapped more than once")]
    DuplicateColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("foreign key {table}.{column} references unmapped table {target}")]
    UnknownTarget {
        table: &'static str,
        column: &'static str,
        target: &'static str,
    },

    #[error("foreign key {table}.{column} must reference the primary key of {target}")]
    TargetNotPrimaryKey {
        table: &'static str,
        column: &'static str,
        target: &'static str,
    },

    #[error("{table} declares more than one relationship to {target}")]
    DuplicateRelationship {
        table: &'static str,
        target: &'static str,
    },

    #[error("required foreign key {table}.{column} must cascade deletes from {target}")]
    MissingCascade {
        table: &'static str,
        column: &'static str,
        target: &'static str,
    },

    #[error("{table}.{column} is nullable but {entity}.{field} is required")]
    NullableRequiredField {
        entity: &'static str,
        field: &'static str,
        table: &'static str,
        column: &'static str,
    },

    #[error("conversion for {table}.{column} uses the same string for true and false")]
    AmbiguousConversion {
        table: &'static str,
        column: &'static str,
    },

    #[error(
        "{table}.{column} allows {column_max} characters but {entity}.{field} allows {constraint_max}"
    )]
    LengthMismatch {
        entity: &'static str,
        field: &'static str,
        table: &'static str,
        column: &'static str,
        column_max: usize,
        constraint_max: usize,
    },

    #[error("{entity} has constraints on {field} but no column maps it")]
    UnmappedField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("storage entity for {table} disagrees with its mapping: {detail}")]
    EntityMismatch { table: &'static str, detail: String },
}

/// Check a set of mappings for completeness and consistency.
pub fn verify(mappings: &[EntityMapping]) -> Result<(), ConfigError> {
    let mut tables = HashSet::new();
    for mapping in mappings {
        if !tables.insert(mapping.table) {
            return Err(ConfigError::DuplicateTable {
                table: mapping.table,
            });
        }
    }

    for mapping in mappings {
        verify_entity_mapping(mapping, mappings)?;
    }

    Ok(())
}

fn verify_entity_mapping(
    mapping: &EntityMapping,
    all: &[EntityMapping],
) -> Result<(), ConfigError> {
    if mapping.primary_key.is_none() {
        return Err(ConfigError::MissingPrimaryKey {
            entity: mapping.entity,
        });
    }

    let mut columns = HashSet::new();
    for column in mapping.column_names() {
        if !columns.insert(column) {
            return Err(ConfigError::DuplicateColumn {
                table: mapping.table,
                column,
            });
        }
    }

    let mut targets = HashSet::new();
    for fk in mapping.foreign_keys {
        let target = all
            .iter()
            .find(|m| m.table == fk.references_table)
            .ok_or(ConfigError::UnknownTarget {
                table: mapping.table,
                column: fk.column,
                target: fk.references_table,
            })?;

        if target.primary_key != Some(fk.references_column) {
            return Err(ConfigError::TargetNotPrimaryKey {
                table: mapping.table,
                column: fk.column,
                target: fk.references_table,
            });
        }

        if !targets.insert(fk.references_table) {
            return Err(ConfigError::DuplicateRelationship {
                table: mapping.table,
                target: fk.references_table,
            });
        }

        let required = mapping
            .constraints
            .iter()
            .any(|c| c.field == fk.field && c.required);
        if required && !fk.cascade_delete {
            return Err(ConfigError::MissingCascade {
                table: mapping.table,
                column: fk.column,
                target: fk.references_table,
            });
        }
    }

    for column in mapping.columns {
        if let Some(conversion) = column.conversion
            && conversion.when_true == conversion.when_false
        {
            return Err(ConfigError::AmbiguousConversion {
                table: mapping.table,
                column: column.column,
            });
        }
    }

    for constraint in mapping.constraints {
        let mapped_column = mapping.columns.iter().find(|c| c.field == constraint.field);
        let mapped_fk = mapping
            .foreign_keys
            .iter()
            .any(|fk| fk.field == constraint.field);

        match mapped_column {
            Some(column) => {
                if constraint.required && column.nullable {
                    return Err(ConfigError::NullableRequiredField {
                        entity: mapping.entity,
                        field: constraint.field,
                        table: mapping.table,
                        column: column.column,
                    });
                }

                if let (Some(column_max), Some(constraint_max)) =
                    (column.max_length, constraint.max_length)
                    && column_max != constraint_max
                {
                    return Err(ConfigError::LengthMismatch {
                        entity: mapping.entity,
                        field: constraint.field,
                        table: mapping.table,
                        column: column.column,
                        column_max,
                        constraint_max,
                    });
                }
            }
            None if mapped_fk => {}
            None => {
                return Err(ConfigError::UnmappedField {
                    entity: mapping.entity,
                    field: constraint.field,
                });
            }
        }
    }

    Ok(())
}

/// Verify the mapping descriptors and the SeaORM entities behind them.
///
/// Called once before the service accepts traffic.
#[cfg(feature = "postgres")]
pub fn verify_registered() -> Result<(), ConfigError> {
    use super::entity::{blog, post};

    verify(MAPPINGS)?;
    verify_storage_entity::<blog::Entity>(&BLOG_MAPPING)?;
    verify_storage_entity::<post::Entity>(&POST_MAPPING)?;

    tracing::info!(entities = MAPPINGS.len(), "Storage mapping verified");
    Ok(())
}

#[cfg(not(feature = "postgres"))]
pub fn verify_registered() -> Result<(), ConfigError> {
    verify(MAPPINGS)?;
    tracing::info!(entities = MAPPINGS.len(), "Storage mapping verified");
    Ok(())
}

#[cfg(feature = "postgres")]
fn verify_storage_entity<E>(mapping: &EntityMapping) -> Result<(), ConfigError>
where
    E: sea_orm::EntityTrait,
{
    use sea_orm::sea_query::{ColumnType, StringLen};
    use sea_orm::{
        ColumnTrait, ForeignKeyAction, Iden, IdenStatic, Identity, Iterable, PrimaryKeyToColumn,
        RelationTrait,
    };

    let mismatch = |detail: String| ConfigError::EntityMismatch {
        table: mapping.table,
        detail,
    };

    let table = E::default().table_name().to_string();
    if table != mapping.table {
        return Err(mismatch(format!("entity table is {table}")));
    }

    let keys: Vec<String> = E::PrimaryKey::iter()
        .map(|key| key.into_column().as_str().to_string())
        .collect();
    if keys != mapping.primary_key.into_iter().collect::<Vec<_>>() {
        return Err(mismatch(format!("entity primary key is {keys:?}")));
    }

    let mut actual: Vec<String> = E::Column::iter().map(|c| c.as_str().to_string()).collect();
    let mut expected = mapping.column_names();
    actual.sort_unstable();
    expected.sort_unstable();
    if actual != expected {
        return Err(mismatch(format!("entity columns are {actual:?}")));
    }

    for column in E::Column::iter() {
        let name = column.as_str();
        let def = column.def();
        let mapped = mapping.columns.iter().find(|c| c.column == name);

        // Key columns are never nullable.
        let nullable = mapped.is_some_and(|c| c.nullable);
        if def.is_null() != nullable {
            return Err(mismatch(format!(
                "column {name} nullable is {}, mapping says {nullable}",
                def.is_null()
            )));
        }

        let length = match def.get_column_type() {
            ColumnType::String(StringLen::N(n)) => Some(*n as usize),
            _ => None,
        };
        let max_length = mapped.and_then(|c| c.max_length);
        if length != max_length {
            return Err(mismatch(format!(
                "column {name} length is {length:?}, mapping says {max_length:?}"
            )));
        }
    }

    let owned: Vec<_> = E::Relation::iter()
        .map(|relation| relation.def())
        .filter(|def| !def.is_owner)
        .collect();
    if owned.len() != mapping.foreign_keys.len() {
        return Err(mismatch(format!(
            "entity declares {} foreign keys, mapping declares {}",
            owned.len(),
            mapping.foreign_keys.len()
        )));
    }

    for def in owned {
        let Identity::Unary(from) = &def.from_col else {
            return Err(mismatch("composite foreign key".to_string()));
        };
        let from = from.to_string();

        let fk = mapping
            .foreign_keys
            .iter()
            .find(|fk| fk.column == from)
            .ok_or_else(|| mismatch(format!("foreign key {from} is not mapped")))?;

        let cascades = matches!(def.on_delete, Some(ForeignKeyAction::Cascade));
        if cascades != fk.cascade_delete {
            return Err(mismatch(format!(
                "foreign key {from} cascade is {cascades}, mapping says {}",
                fk.cascade_delete
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_round_trip() {
        assert_eq!(IS_ACTIVE.encode(true), "Blog is active");
        assert_eq!(IS_ACTIVE.encode(false), "Blog is not active");
        for value in [true, false] {
            assert_eq!(IS_ACTIVE.decode(IS_ACTIVE.encode(value)), value);
        }
    }

    #[test]
    fn test_unknown_strings_decode_to_false() {
        for stored in ["", "true", "Blog is Active", "Blog is active ", "yes", "1"] {
            assert!(!IS_ACTIVE.decode(stored), "{stored:?} must decode to false");
        }
    }

    #[test]
    fn test_registered_mappings_are_valid() {
        verify(MAPPINGS).unwrap();
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_storage_entities_match_mappings() {
        verify_registered().unwrap();
    }

    #[test]
    fn test_missing_primary_key_fails() {
        let broken = EntityMapping {
            primary_key: None,
            ..BLOG_MAPPING
        };
        assert_eq!(
            verify(&[broken, POST_MAPPING]),
            Err(ConfigError::MissingPrimaryKey { entity: "Blog" })
        );
    }

    #[test]
    fn test_second_relationship_to_same_table_fails() {
        const TWICE: &[ForeignKeyMapping] = &[
            ForeignKeyMapping {
                field: "blog_id",
                column: "blog_id",
                references_table: "blogs",
                references_column: "blog_id",
                cascade_delete: true,
            },
            ForeignKeyMapping {
                field: "blog",
                column: "blog_blog_id",
                references_table: "blogs",
                references_column: "blog_id",
                cascade_delete: false,
            },
        ];
        let broken = EntityMapping {
            foreign_keys: TWICE,
            ..POST_MAPPING
        };
        assert_eq!(
            verify(&[BLOG_MAPPING, broken]),
            Err(ConfigError::DuplicateRelationship {
                table: "articles",
                target: "blogs",
            })
        );
    }

    #[test]
    fn test_foreign_key_to_unmapped_table_fails() {
        assert!(matches!(
            verify(&[POST_MAPPING]),
            Err(ConfigError::UnknownTarget { target: "blogs", .. })
        ));
    }

    #[test]
    fn test_storage_length_must_match_constraint() {
        const COLUMNS: &[ColumnMapping] = &[
            ColumnMapping::new("name", "name").max_length(60),
            ColumnMapping::new("is_active", "is_active").converted(IS_ACTIVE),
        ];
        let broken = EntityMapping {
            columns: COLUMNS,
            ..BLOG_MAPPING
        };
        assert!(matches!(
            verify(&[broken, POST_MAPPING]),
            Err(ConfigError::LengthMismatch {
                column_max: 60,
                constraint_max: 50,
                ..
            })
        ));
    }

    #[test]
    fn test_ambiguous_conversion_fails() {
        const COLUMNS: &[ColumnMapping] = &[
            ColumnMapping::new("name", "name").max_length(50),
            ColumnMapping::new("is_active", "is_active").converted(BoolText::new("on", "on")),
        ];
        let broken = EntityMapping {
            columns: COLUMNS,
            ..BLOG_MAPPING
        };
        assert!(matches!(
            verify(&[broken, POST_MAPPING]),
            Err(ConfigError::AmbiguousConversion { .. })
        ));
    }

    const NO_CASCADE: &[ForeignKeyMapping] = &[ForeignKeyMapping {
        field: "blog_id",
        column: "blog_id",
        references_table: "blogs",
        references_column: "blog_id",
        cascade_delete: false,
    }];

    #[test]
    fn test_required_parent_must_cascade() {
        let broken = EntityMapping {
            foreign_keys: NO_CASCADE,
            ..POST_MAPPING
        };
        assert_eq!(
            verify(&[BLOG_MAPPING, broken]),
            Err(ConfigError::MissingCascade {
                table: "articles",
                column: "blog_id",
                target: "blogs",
            })
        );
    }

    #[test]
    fn test_required_field_on_nullable_column_fails() {
        const COLUMNS: &[ColumnMapping] = &[
            ColumnMapping::new("name", "name").max_length(50),
            ColumnMapping::new("content", "content").max_length(1000).nullable(),
            ColumnMapping::new("created", "created"),
            ColumnMapping::new("updated", "updated").nullable(),
        ];
        let broken = EntityMapping {
            columns: COLUMNS,
            ..POST_MAPPING
        };
        assert_eq!(
            verify(&[BLOG_MAPPING, broken]),
            Err(ConfigError::NullableRequiredField {
                entity: "Post",
                field: "content",
                table: "articles",
                column: "content",
            })
        );
    }

    #[cfg(feature = "postgres")]
    mod storage {
        use super::*;
        use crate::database::entity::{blog, post};

        fn detail(result: Result<(), ConfigError>) -> String {
            match result {
                Err(ConfigError::EntityMismatch { detail, .. }) => detail,
                other => panic!("expected entity mismatch, got {other:?}"),
            }
        }

        #[test]
        fn test_relation_without_cascade_is_rejected() {
            let mapping = EntityMapping {
                foreign_keys: NO_CASCADE,
                ..POST_MAPPING
            };
            let detail = detail(verify_storage_entity::<post::Entity>(&mapping));
            assert!(detail.contains("cascade"), "{detail}");
        }

        #[test]
        fn test_nullability_must_match_entity() {
            const COLUMNS: &[ColumnMapping] = &[
                ColumnMapping::new("name", "name").max_length(50),
                ColumnMapping::new("content", "content").max_length(1000),
                ColumnMapping::new("created", "created"),
                ColumnMapping::new("updated", "updated"),
            ];
            let mapping = EntityMapping {
                columns: COLUMNS,
                ..POST_MAPPING
            };
            let detail = detail(verify_storage_entity::<post::Entity>(&mapping));
            assert!(detail.contains("column updated nullable"), "{detail}");
        }

        #[test]
        fn test_string_length_must_match_entity() {
            const COLUMNS: &[ColumnMapping] = &[
                ColumnMapping::new("name", "name"),
                ColumnMapping::new("is_active", "is_active").converted(IS_ACTIVE),
            ];
            let mapping = EntityMapping {
                columns: COLUMNS,
                ..BLOG_MAPPING
            };
            let detail = detail(verify_storage_entity::<blog::Entity>(&mapping));
            assert!(detail.contains("column name length"), "{detail}");
        }
    }

    #[test]
    fn test_column_names_cover_schema() {
        assert_eq!(BLOG_MAPPING.column_names(), vec!["blog_id", "name", "is_active"]);
        assert_eq!(
            POST_MAPPING.column_names(),
            vec!["post_id", "blog_id", "name", "content", "created", "updated"]
        );
    }
}
