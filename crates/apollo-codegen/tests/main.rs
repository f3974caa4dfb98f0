mod fragments;
mod lift;
mod lowering;
mod merge;
mod registry;
