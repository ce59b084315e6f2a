//! Transform registry reducer.
//!
//! Registering a renderer for a MIME type also promotes that type to the
//! front of the display order, so freshly registered renderers win the
//! richest-type race.

use crate::actions::Action;
use crate::state::AppState;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::AddTransform {
            media_type,
            transform,
        } => {
            let transforms = &mut state.core.entities.transforms;
            transforms
                .by_id
                .insert(media_type.clone(), transform.clone());
            if !transforms.display_order.iter().any(|t| t == media_type) {
                transforms.display_order.insert(0, media_type.clone());
            }
        }

        Action::RemoveTransform { media_type } => {
            let transforms = &mut state.core.entities.transforms;
            transforms.by_id.remove(media_type);
            transforms.display_order.retain(|t| t != media_type);
        }

        _ => {}
    }
}
