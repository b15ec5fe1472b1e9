mod exercise;
mod food;
mod helpers;
mod routine;
mod transfer;
mod weight;
mod workout;

pub(crate) use exercise::{cmd_exercise_add, cmd_exercise_delete, cmd_exercise_list};
pub(crate) use food::{cmd_food_delete, cmd_food_list, cmd_food_log};
pub(crate) use routine::{cmd_routine_create, cmd_routine_delete, cmd_routine_list};
pub(crate) use transfer::{cmd_export, cmd_import, cmd_reset};
pub(crate) use weight::{cmd_weight_delete, cmd_weight_history, cmd_weight_log};
pub(crate) use workout::{
    cmd_last, cmd_workout_delete, cmd_workout_list, cmd_workout_log, cmd_workout_show,
};
