// Presentation layer - facade and collaborator seams
pub mod chart_screen;
pub mod surfaces;
