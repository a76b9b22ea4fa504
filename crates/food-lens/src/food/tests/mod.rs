mod common;
mod routing;
mod suggestions;
