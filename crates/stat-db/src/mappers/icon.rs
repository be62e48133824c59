//! IconRecord <-> model mapper

use stat_core::entities::IconRecord;

use crate::models::IconModel;

impl From<IconModel> for IconRecord {
    fn from(model: IconModel) -> Self {
        IconRecord {
            game: model.game,
            location: model.location,
            color: model.color,
        }
    }
}
