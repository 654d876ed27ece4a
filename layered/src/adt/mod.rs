//! Abstract data types that are not specific to the layered graph model.

pub mod ns;
