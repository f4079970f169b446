//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod consignment;
pub mod counter;
pub mod customer;
pub mod payment;
pub mod product;
pub mod transaction;

pub use consignment::{
    ConsignmentFilter, ConsignmentItemInput, ConsignmentRepoError, ConsignmentRepository,
    CreateConsignmentInput, UpdateConsignmentInput,
};
pub use counter::{CounterError, CounterRepository};
pub use customer::{
    CreateCustomerInput, CustomerError, CustomerRepository, UpdateCustomerInput,
};
pub use payment::{
    ApplyPaymentInput, CreatePaymentInput, PaymentFilter, PaymentRepoError, PaymentRepository,
    PaymentWithDetails,
};
pub use product::{CreateProductInput, ProductError, ProductRepository, UpdateProductInput};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    TransactionWithPayment, UpdateTransactionInput,
};
