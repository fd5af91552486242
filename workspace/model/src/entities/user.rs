use sea_orm::entity::prelude::*;

/// Role of an account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserType {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Represents a user of the system.
///
/// `password_hash` is an argon2id PHC string; the plaintext password is never
/// stored. `submitted_by` records which user provisioned this account and is
/// nulled out when that user is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub user_type: UserType,
    pub password_hash: String,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub submitted_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Provenance: the user who created this account.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::SubmittedBy",
        to = "Column::Id"
    )]
    SubmittedBy,
    #[sea_orm(has_many = "super::department::Entity")]
    Department,
    #[sea_orm(has_many = "super::course::Entity")]
    Course,
    #[sea_orm(has_many = "super::student::Entity")]
    Student,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl ActiveModelBehavior for ActiveModel {}
