mod sleep;
mod statistics;
mod trend;
