pub mod a001_bill;
