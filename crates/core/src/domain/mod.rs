pub mod contract;
pub mod marketplace;
pub mod preview;
pub mod reqdoc;
pub mod response;
pub mod solution;
