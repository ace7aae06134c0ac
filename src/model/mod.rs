pub mod department;
pub mod designation;
pub mod employee;
pub mod employee_type;
