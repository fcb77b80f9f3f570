mod cli;
mod heatmap;
