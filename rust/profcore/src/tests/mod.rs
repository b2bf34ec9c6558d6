mod fixture;

mod fetch_tests;
mod hover_tests;
