use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    /// National identity number.
    #[sea_orm(primary_key, auto_increment = false)]
    pub national_id: String,

    pub roll_no: String,

    pub name: String,

    pub class_group: String,

    pub school: String,

    /// ISO 8601 date (YYYY-MM-DD).
    pub date_of_birth: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
