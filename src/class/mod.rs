pub mod exchange;
pub mod links;
pub mod loader;
pub mod model;
pub mod size;

pub use exchange::ExchangeGraph;
pub use links::LinkHolder;
pub use loader::{Explorable, LoaderStats, MutationClassLoader};
pub use model::{ClassItem, ClassSize, ClassState, Link, MemberId};
pub use size::{class_size, is_mutation_finite, mutation_equivalent};
