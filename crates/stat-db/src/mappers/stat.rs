//! StatRecord <-> model mapper

use stat_core::entities::StatRecord;
use stat_core::value_objects::Snowflake;

use crate::models::StatModel;

impl From<StatModel> for StatRecord {
    fn from(model: StatModel) -> Self {
        StatRecord {
            user_id: Snowflake::new(model.user_id),
            game: model.game,
            duration_ms: model.duration_ms,
            ignored: model.ignored,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
