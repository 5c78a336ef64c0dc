pub mod todo;

pub use todo::{
    ActiveModel as TodoActiveModel, Column as TodoColumn, Entity as TodoEntity, Model as Todo,
};
