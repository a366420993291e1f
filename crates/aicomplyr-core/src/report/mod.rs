pub mod model;
pub mod recommend;
pub mod render;
pub mod risk;
pub mod score;
pub mod violations;
