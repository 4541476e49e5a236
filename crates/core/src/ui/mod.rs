pub mod ui_state_machine;
