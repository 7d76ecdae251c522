mod dispatch_test;
