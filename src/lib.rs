pub mod pnc_framework {
    pub mod activity_key;
    pub mod exportable;
    pub mod importable;
    pub mod infoable;
    pub mod multiple_reader;
    pub mod pnc_command;
    pub mod pnc_input;
    pub mod pnc_output;
}
pub mod pnc_commands {
    pub mod pnc_command_conformance;
    pub mod pnc_command_info;
}
pub mod pnc_objects {
    pub mod alignment;
    pub mod alignments;
    pub mod comparable_alignment;
    pub mod event_log;
    pub mod net_description;
    pub mod node;
    pub mod petri_net;
}
pub mod semantics {
    pub mod net_execution;
}
pub mod techniques {
    pub mod align;
    pub mod align_log;
    pub mod fitness;
    pub mod search_state;
}
pub mod error;
pub mod line_reader;
pub mod marking;
